//! Scripted fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::app::{NewswatchError, Result};
use crate::fetcher::{Fetcher, RawEntry};

enum Reply {
    Entries(Vec<RawEntry>),
    Fail(String),
    Stall(Duration),
}

#[derive(Default)]
pub struct StubFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(self, keyword: &str, entries: Vec<RawEntry>) -> Self {
        self.set_entries(keyword, entries);
        self
    }

    pub fn with_failure(self, keyword: &str, reason: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(keyword.to_string(), Reply::Fail(reason.to_string()));
        self
    }

    /// Never answers before `delay` has passed.
    pub fn with_stall(self, keyword: &str, delay: Duration) -> Self {
        self.set_stall(keyword, delay);
        self
    }

    pub fn set_stall(&self, keyword: &str, delay: Duration) {
        self.replies
            .lock()
            .unwrap()
            .insert(keyword.to_string(), Reply::Stall(delay));
    }

    pub fn set_entries(&self, keyword: &str, entries: Vec<RawEntry>) {
        self.replies
            .lock()
            .unwrap()
            .insert(keyword.to_string(), Reply::Entries(entries));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }

    /// When each search started, in call order.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn search(&self, keyword: &str) -> Result<Vec<RawEntry>> {
        self.calls
            .lock()
            .unwrap()
            .push((keyword.to_string(), Instant::now()));

        let (stall, reply) = {
            let replies = self.replies.lock().unwrap();
            match replies.get(keyword) {
                Some(Reply::Entries(entries)) => (None, Ok(entries.clone())),
                Some(Reply::Fail(reason)) => {
                    (None, Err(NewswatchError::FeedParse(reason.clone())))
                }
                Some(Reply::Stall(delay)) => (Some(*delay), Ok(Vec::new())),
                None => (None, Ok(Vec::new())),
            }
        };

        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

pub fn entry(title: &str, link: &str) -> RawEntry {
    RawEntry {
        title: title.to_string(),
        link: link.to_string(),
        published: None,
    }
}
