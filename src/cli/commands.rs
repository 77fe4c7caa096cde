use crate::app::{AppContext, Result};
use crate::domain::{ItemFilter, SaveAction, SettingsUpdate};
use crate::service::ItemQuery;

pub fn show_status(ctx: &AppContext) -> Result<()> {
    let status = ctx.service.status()?;

    let last_scan = status
        .last_scan_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!("Items:      {} ({} new)", status.total_news, status.new_count);
    println!("Saved:      {}", status.saved_count);
    println!("Keywords:   {}", status.keyword_count);
    println!("Scans:      {} (last: {})", status.scan_count, last_scan);
    println!(
        "Auto scan:  {} (every {} min)",
        if status.auto_scan { "on" } else { "off" },
        status.interval_minutes
    );
    if status.is_scanning {
        println!("A scan is running");
    }
    Ok(())
}

pub fn list_items(
    ctx: &AppContext,
    filter: ItemFilter,
    keyword: Option<String>,
    limit: usize,
) -> Result<()> {
    let page = ctx.service.list_items(&ItemQuery {
        filter,
        keyword,
        limit: Some(limit),
    })?;

    if page.news.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in &page.news {
        let marker = if item.is_new { "*" } else { " " };
        println!(
            "{} {} [{}] {} ({})\n    {}\n    id: {}",
            marker,
            item.published_at.format("%Y-%m-%d %H:%M"),
            item.keyword,
            item.display_title(),
            item.source,
            item.url,
            item.id
        );
    }

    if page.total > page.news.len() {
        println!("Showing {} of {} items", page.news.len(), page.total);
    }
    Ok(())
}

pub fn list_keywords(ctx: &AppContext) -> Result<()> {
    let keywords = ctx.service.list_keywords()?;

    if keywords.is_empty() {
        println!("No keywords");
        return Ok(());
    }

    for keyword in keywords {
        println!("{} ({} items)", keyword.name, keyword.count);
    }
    Ok(())
}

pub fn add_keyword(ctx: &AppContext, text: &str) -> Result<()> {
    let keyword = ctx.service.add_keyword(text)?;
    println!("Added keyword: {}", keyword);
    Ok(())
}

pub fn remove_keyword(ctx: &AppContext, text: &str) -> Result<()> {
    ctx.service.remove_keyword(text)?;
    println!("Removed keyword: {}", text);
    Ok(())
}

pub async fn scan(ctx: &AppContext) -> Result<()> {
    println!("Scanning...");
    let count = ctx.service.trigger_scan().await?;
    println!("Scan complete: {} new items", count);
    Ok(())
}

pub fn toggle_saved(ctx: &AppContext, id: &str) -> Result<()> {
    match ctx.service.toggle_saved(id)? {
        SaveAction::Saved => println!("Saved {}", id),
        SaveAction::Removed => println!("Unsaved {}", id),
    }
    Ok(())
}

pub fn update_settings(ctx: &AppContext, update: SettingsUpdate) -> Result<()> {
    let settings = if update.is_empty() {
        ctx.store.snapshot()?.settings()
    } else {
        ctx.service.update_settings(&update)?
    };

    println!(
        "Auto scan: {} (every {} min)",
        if settings.auto_scan { "on" } else { "off" },
        settings.interval_minutes
    );
    Ok(())
}
