// File: ./src/linkcheck.rs
//! Reachability checks for every outbound link of the upcoming events.
//!
//! Each link gets its own task. Tasks of the same domain share a semaphore
//! with `per_domain_limit` permits; different domains never wait on each
//! other. Failures are collected and reported, never propagated.
use crate::model::EventId;
use crate::store::EventStore;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use strum::Display;
use tokio::sync::{Semaphore, mpsc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LinkRole {
    Main,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckUrl {
    pub url: String,
    pub event_name: String,
    pub role: LinkRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFailure {
    pub check: CheckUrl,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct LinkReport {
    pub checked: usize,
    pub failures: Vec<LinkFailure>,
}

impl LinkReport {
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.failures.iter().map(|f| {
            format!(
                "Invalid {} link in event '{}': {} -> {}",
                f.check.role, f.check.event_name, f.check.url, f.error
            )
        })
    }
}

/// A single reachability probe. Implementations enforce their own timeout.
pub trait UrlCheck: Send + Sync {
    fn check(&self, url: &str) -> impl Future<Output = Result<(), String>> + Send;
}

/// Host part of a URL; text without a scheme is taken as the host itself.
pub fn extract_domain(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    let end = rest.find(['/', '#', '?']).unwrap_or(rest.len());
    &rest[..end]
}

/// Main link plus every external secondary link of the given events.
pub fn collect_check_urls(store: &EventStore, ids: &[EventId]) -> Vec<CheckUrl> {
    let mut urls = Vec::new();
    for event in store.resolve(ids).filter(|e| !e.is_separator()) {
        let mut push = |url: &str, role| {
            urls.push(CheckUrl {
                url: url.to_string(),
                event_name: event.name.orig.clone(),
                role,
            })
        };
        if let Some(main) = &event.main_link {
            push(&main.url, LinkRole::Main);
        }
        for link in event.links.iter().filter(|l| l.is_external()) {
            push(&link.url, LinkRole::Link);
        }
    }
    urls
}

pub async fn check_links<C>(urls: Vec<CheckUrl>, checker: Arc<C>, per_domain_limit: usize) -> LinkReport
where
    C: UrlCheck + 'static,
{
    let total = urls.len();
    if total == 0 {
        return LinkReport::default();
    }

    let mut by_domain: HashMap<String, Vec<CheckUrl>> = HashMap::new();
    for u in urls {
        by_domain.entry(extract_domain(&u.url).to_string()).or_default().push(u);
    }

    let (tx, mut rx) = mpsc::channel(total);
    for (domain, list) in by_domain {
        log::info!("Checking {} links for domain {}", list.len(), domain);
        let gate = Arc::new(Semaphore::new(per_domain_limit.max(1)));
        for u in list {
            let gate = gate.clone();
            let checker = checker.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = match gate.acquire_owned().await {
                    Ok(_permit) => checker.check(&u.url).await,
                    Err(e) => Err(e.to_string()),
                };
                let _ = tx.send((u, result)).await;
            });
        }
    }
    drop(tx);

    let mut report = LinkReport::default();
    while let Some((check, result)) = rx.recv().await {
        report.checked += 1;
        if let Err(error) = result {
            report.failures.push(LinkFailure { check, error });
        }
    }
    report
}
