//! Read and mutate operations offered to presentation layers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::app::Result;
use crate::domain::{Item, ItemFilter, KeywordCount, SaveAction, Settings, SettingsUpdate};
use crate::scanner::Scanner;
use crate::scheduler::{Scheduler, SchedulerState};
use crate::store::SharedStore;

pub const DEFAULT_ITEM_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub total_news: usize,
    pub new_count: usize,
    pub scan_count: u64,
    pub saved_count: usize,
    pub keyword_count: usize,
    pub last_scan_time: Option<DateTime<Utc>>,
    pub auto_scan: bool,
    pub interval_minutes: u32,
    pub is_scanning: bool,
}

/// A capped listing plus the number of items that matched before capping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPage {
    pub news: Vec<Item>,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub filter: ItemFilter,
    /// Exact keyword match; `None` or empty means every keyword.
    pub keyword: Option<String>,
    pub limit: Option<usize>,
}

pub struct NewsService {
    store: Arc<SharedStore>,
    scanner: Arc<Scanner>,
    scheduler: Scheduler,
}

impl NewsService {
    pub fn new(store: Arc<SharedStore>, scanner: Arc<Scanner>) -> Self {
        let scheduler = Scheduler::new(scanner.clone());
        Self {
            store,
            scanner,
            scheduler,
        }
    }

    /// Configure the scheduler from the persisted settings.
    pub fn start(&self) -> Result<Settings> {
        let settings = self.store.snapshot()?.settings();
        self.scheduler.configure(&settings);
        Ok(settings)
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn shutdown(&self) {
        self.scheduler.stop();
    }

    pub fn status(&self) -> Result<Status> {
        let doc = self.store.snapshot()?;
        Ok(Status {
            total_news: doc.news.len(),
            new_count: doc.new_count(),
            scan_count: doc.scan_count,
            saved_count: doc.saved_ids.len(),
            keyword_count: doc.keywords.len(),
            last_scan_time: doc.last_scan_time,
            auto_scan: doc.auto_scan,
            interval_minutes: doc.interval_minutes,
            is_scanning: self.scanner.is_scanning(),
        })
    }

    pub fn list_items(&self, query: &ItemQuery) -> Result<ItemPage> {
        let doc = self.store.snapshot()?;
        let keyword = query.keyword.as_deref().filter(|k| !k.is_empty());
        let matched = doc.filter_items(query.filter, keyword);
        let limit = query.limit.unwrap_or(DEFAULT_ITEM_LIMIT);

        Ok(ItemPage {
            total: matched.len(),
            news: matched.into_iter().take(limit).cloned().collect(),
        })
    }

    pub fn list_keywords(&self) -> Result<Vec<KeywordCount>> {
        Ok(self.store.snapshot()?.keyword_counts())
    }

    /// Returns the keyword as stored (trimmed, lowercased).
    pub fn add_keyword(&self, text: &str) -> Result<String> {
        let keyword = self.store.mutate(|doc| doc.add_keyword(text))?;
        info!(keyword = %keyword, "keyword added");
        Ok(keyword)
    }

    pub fn remove_keyword(&self, text: &str) -> Result<()> {
        let removed = self.store.mutate(|doc| Ok(doc.remove_keyword(text)))?;
        if removed > 0 {
            info!(keyword = %text, "keyword removed");
        }
        Ok(())
    }

    /// Scan now. Waits for a scan that is already running to finish first.
    pub async fn trigger_scan(&self) -> Result<usize> {
        self.scanner.run_scan().await
    }

    pub fn toggle_saved(&self, item_id: &str) -> Result<SaveAction> {
        self.store.mutate(|doc| Ok(doc.toggle_saved(item_id)))
    }

    /// Apply the supplied fields, persist, then reschedule.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings> {
        let settings = self.store.mutate(|doc| doc.apply_settings(update))?;
        self.scheduler.configure(&settings);
        Ok(settings)
    }

    /// Reschedule if the persisted settings differ from `applied`, e.g. after
    /// another process changed them. Returns the current settings.
    pub fn sync_settings(&self, applied: Settings) -> Result<Settings> {
        let current = self.store.snapshot()?.settings();
        if current != applied {
            info!("Settings changed on disk, rescheduling");
            self.scheduler.configure(&current);
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NewswatchError;
    use crate::domain::{Document, MAX_ITEMS};
    use crate::fetcher::stub::{entry, StubFetcher};
    use crate::fetcher::RawEntry;
    use crate::scanner::ScanOptions;
    use crate::store::{JsonStore, Store};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    struct Harness {
        _dir: tempfile::TempDir,
        json: Arc<JsonStore>,
        fetcher: Arc<StubFetcher>,
        service: NewsService,
    }

    fn harness(keywords: &[&str]) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let json = Arc::new(JsonStore::new(dir.path().join("data.json")));
        json.save(&Document {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        })
        .unwrap();

        let store = Arc::new(SharedStore::new(json.clone()));
        let fetcher = Arc::new(StubFetcher::new());
        let scanner = Arc::new(Scanner::new(
            store.clone(),
            fetcher.clone(),
            ScanOptions {
                keyword_spacing: Duration::ZERO,
                fetch_timeout: Duration::from_secs(5),
            },
        ));

        Harness {
            _dir: dir,
            json,
            fetcher,
            service: NewsService::new(store, scanner),
        }
    }

    #[tokio::test]
    async fn test_status_reflects_scan() {
        let h = harness(&["deprem", "toki"]);
        h.fetcher.set_entries(
            "deprem",
            vec![entry("Quake hits city - NewsCo", "https://x/1")],
        );
        assert_eq!(h.service.trigger_scan().await.unwrap(), 1);

        let status = h.service.status().unwrap();
        assert_eq!(status.total_news, 1);
        assert_eq!(status.new_count, 1);
        assert_eq!(status.scan_count, 1);
        assert_eq!(status.saved_count, 0);
        assert_eq!(status.keyword_count, 2);
        assert!(status.last_scan_time.is_some());
        assert!(status.auto_scan);
        assert_eq!(status.interval_minutes, 5);
        assert!(!status.is_scanning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_scan_in_progress() {
        let h = harness(&["slow"]);
        h.fetcher.set_stall("slow", Duration::from_secs(3));
        let service = Arc::new(h.service);

        let running = {
            let service = service.clone();
            tokio::spawn(async move { service.trigger_scan().await })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(service.status().unwrap().is_scanning);

        assert_eq!(running.await.unwrap().unwrap(), 0);
        let status = service.status().unwrap();
        assert!(!status.is_scanning);
        assert_eq!(status.scan_count, 1);
    }

    #[tokio::test]
    async fn test_list_items_filters_and_caps() {
        let h = harness(&["a", "b"]);
        h.fetcher.set_entries(
            "a",
            vec![entry("1", "https://x/1"), entry("2", "https://x/2"), entry("3", "https://x/3")],
        );
        h.fetcher.set_entries("b", vec![entry("4", "https://x/4")]);
        h.service.trigger_scan().await.unwrap();

        let page = h
            .service
            .list_items(&ItemQuery {
                keyword: Some("a".into()),
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.news.len(), 2);
        assert!(page.news.iter().all(|i| i.keyword == "a"));

        let everything = h
            .service
            .list_items(&ItemQuery {
                keyword: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(everything.total, 4);

        let none = h
            .service
            .list_items(&ItemQuery {
                keyword: Some("nothing-matches".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(none.total, 0);
        assert!(none.news.is_empty());
    }

    #[tokio::test]
    async fn test_new_and_saved_filters() {
        let h = harness(&["a"]);
        h.fetcher.set_entries("a", vec![entry("1", "https://x/1")]);
        h.service.trigger_scan().await.unwrap();
        h.fetcher
            .set_entries("a", vec![entry("1", "https://x/1"), entry("2", "https://x/2")]);
        h.service.trigger_scan().await.unwrap();

        let new_page = h
            .service
            .list_items(&ItemQuery {
                filter: ItemFilter::New,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(new_page.total, 1);
        assert_eq!(new_page.news[0].url, "https://x/2");

        let old_id = h.json.load().unwrap().news[1].id.clone();
        assert_eq!(h.service.toggle_saved(&old_id).unwrap(), SaveAction::Saved);
        let saved = h
            .service
            .list_items(&ItemQuery {
                filter: ItemFilter::Saved,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(saved.total, 1);
        assert_eq!(saved.news[0].id, old_id);
        assert_eq!(h.service.status().unwrap().saved_count, 1);
    }

    #[tokio::test]
    async fn test_keyword_mutations() {
        let h = harness(&["deprem"]);

        assert_ok!(h.service.add_keyword("  Hisse "));
        let dup = assert_err!(h.service.add_keyword("DEPREM"));
        assert!(matches!(dup, NewswatchError::Duplicate(_)));
        let blank = assert_err!(h.service.add_keyword("  "));
        assert!(matches!(blank, NewswatchError::InvalidInput(_)));

        assert_ok!(h.service.remove_keyword("not-there"));
        assert_eq!(
            h.json.load().unwrap().keywords,
            vec!["deprem".to_string(), "hisse".to_string()]
        );

        assert_ok!(h.service.remove_keyword("deprem"));
        assert_eq!(h.json.load().unwrap().keywords, vec!["hisse".to_string()]);
    }

    #[tokio::test]
    async fn test_keyword_counts() {
        let h = harness(&["a", "b"]);
        h.fetcher
            .set_entries("a", vec![entry("1", "https://x/1"), entry("2", "https://x/2")]);
        h.service.trigger_scan().await.unwrap();

        let counts = h.service.list_keywords().unwrap();
        assert_eq!(
            counts,
            vec![
                KeywordCount { name: "a".into(), count: 2 },
                KeywordCount { name: "b".into(), count: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_saved_after_eviction() {
        let h = harness(&["a"]);
        h.fetcher.set_entries("a", vec![entry("keep", "https://x/keep")]);
        h.service.trigger_scan().await.unwrap();
        let id = h.json.load().unwrap().news[0].id.clone();
        assert_eq!(h.service.toggle_saved(&id).unwrap(), SaveAction::Saved);

        let later = chrono::Utc::now() + chrono::Duration::days(1);
        let flood: Vec<RawEntry> = (0..MAX_ITEMS)
            .map(|i| RawEntry {
                published: Some(later),
                ..entry("flood", &format!("https://y/{}", i))
            })
            .collect();
        h.fetcher.set_entries("a", flood);
        h.service.trigger_scan().await.unwrap();

        assert!(h.json.load().unwrap().news.iter().all(|i| i.id != id));
        assert_eq!(h.service.status().unwrap().saved_count, 1);
        assert_eq!(h.service.toggle_saved(&id).unwrap(), SaveAction::Removed);
        assert_eq!(h.service.toggle_saved(&id).unwrap(), SaveAction::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_settings_persists_and_reschedules() {
        let h = harness(&["a"]);
        h.service.start().unwrap();
        assert_eq!(
            h.service.scheduler_state(),
            SchedulerState::Active {
                interval: Duration::from_secs(300)
            }
        );

        let settings = h
            .service
            .update_settings(&SettingsUpdate {
                interval_minutes: Some(15),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.interval_minutes, 15);
        assert!(settings.auto_scan);
        assert_eq!(h.json.load().unwrap().interval_minutes, 15);
        assert_eq!(
            h.service.scheduler_state(),
            SchedulerState::Active {
                interval: Duration::from_secs(900)
            }
        );

        h.service
            .update_settings(&SettingsUpdate {
                auto_scan: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(h.service.scheduler_state(), SchedulerState::Idle);
        assert!(!h.json.load().unwrap().auto_scan);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_settings_leave_schedule_alone() {
        let h = harness(&["a"]);
        h.service.start().unwrap();

        let err = h
            .service
            .update_settings(&SettingsUpdate {
                interval_minutes: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, NewswatchError::InvalidInput(_)));
        assert_eq!(h.json.load().unwrap().interval_minutes, 5);
        assert_eq!(
            h.service.scheduler_state(),
            SchedulerState::Active {
                interval: Duration::from_secs(300)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_settings_picks_up_external_change() {
        let h = harness(&["a"]);
        let applied = h.service.start().unwrap();

        let mut doc = h.json.load().unwrap();
        doc.auto_scan = false;
        h.json.save(&doc).unwrap();

        let current = h.service.sync_settings(applied).unwrap();
        assert!(!current.auto_scan);
        assert_eq!(h.service.scheduler_state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_serialized() {
        let h = harness(&[]);
        let service = Arc::new(h.service);

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                service.add_keyword(&format!("kw{}", i))
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(h.json.load().unwrap().keywords.len(), 16);
    }

    #[tokio::test]
    async fn test_concurrent_scans_do_not_interleave() {
        let h = harness(&["a"]);
        h.fetcher.set_entries("a", vec![entry("1", "https://x/1")]);
        let service = Arc::new(h.service);

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.trigger_scan().await })
        };
        let second = {
            let service = service.clone();
            tokio::spawn(async move { service.trigger_scan().await })
        };

        let mut counts = vec![first.await.unwrap().unwrap(), second.await.unwrap().unwrap()];
        counts.sort();
        assert_eq!(counts, vec![0, 1]);

        let doc = h.json.load().unwrap();
        assert_eq!(doc.scan_count, 2);
        assert_eq!(doc.news.len(), 1);
    }
}
