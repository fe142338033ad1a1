//! Context assembly.
//!
//! Fetches every selected provider concurrently and concatenates the
//! results, in registration order, after a current-time line. A provider
//! that fails contributes an `unavailable` marker instead of its block; it
//! never prevents the others from contributing.

use aide_types::status::ProviderStatus;
use chrono::{DateTime, Local};
use futures_util::future::join_all;
use tracing::{debug, warn};

use super::box_provider::BoxContextProvider;

struct Source {
    provider: BoxContextProvider,
    last_updated: Option<DateTime<Local>>,
}

/// Ordered set of registered context providers.
#[derive(Default)]
pub struct ContextAssembler {
    sources: Vec<Source>,
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: BoxContextProvider) {
        self.sources.push(Source {
            provider,
            last_updated: None,
        });
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Provider names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.provider.name().to_string())
            .collect()
    }

    pub fn status(&self) -> Vec<ProviderStatus> {
        self.sources
            .iter()
            .map(|s| ProviderStatus {
                name: s.provider.name().to_string(),
                last_updated: s.last_updated,
            })
            .collect()
    }

    /// Build the context text for a query.
    ///
    /// `selected` restricts fetching to the named providers; `None` fetches
    /// all of them. The result always starts with the timestamp line and
    /// ends with a blank line so the query can be appended directly.
    pub async fn assemble(&mut self, selected: Option<&[String]>, now: DateTime<Local>) -> String {
        let wanted: Vec<usize> = self
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| selected.is_none_or(|names| names.iter().any(|n| n == s.provider.name())))
            .map(|(i, _)| i)
            .collect();

        let results = join_all(wanted.iter().map(|&i| self.sources[i].provider.fetch())).await;

        let mut text = timestamp_line(now);
        text.push_str("\n\n");

        for (&i, result) in wanted.iter().zip(results) {
            let source = &mut self.sources[i];
            let name = source.provider.name();
            match result {
                Ok(block) => {
                    source.last_updated = Some(now);
                    let block = block.trim_end();
                    if block.is_empty() {
                        debug!(provider = name, "context provider had nothing to report");
                        continue;
                    }
                    text.push_str(&format!("[{name}]\n{block}\n\n"));
                }
                Err(e) => {
                    warn!(provider = name, error = %e, "context provider failed");
                    text.push_str(&format!("[{name}] unavailable: {e}\n\n"));
                }
            }
        }

        text
    }
}

/// Human-readable local time line that opens every context block.
pub fn timestamp_line(now: DateTime<Local>) -> String {
    format!("Current time: {}", now.format("%A, %B %-d, %Y %H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingProvider, FixedProvider};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 5, 0).unwrap()
    }

    fn assembler(providers: Vec<BoxContextProvider>) -> ContextAssembler {
        let mut assembler = ContextAssembler::new();
        for p in providers {
            assembler.register(p);
        }
        assembler
    }

    #[tokio::test]
    async fn test_blocks_follow_registration_order() {
        let mut asm = assembler(vec![
            BoxContextProvider::new(FixedProvider::new("calendar", "standup at 10")),
            BoxContextProvider::new(FixedProvider::new("tasks", "file taxes")),
        ]);

        let text = asm.assemble(None, fixed_now()).await;
        assert!(text.starts_with("Current time: Saturday, March 14, 2026 09:05\n\n"));
        let cal = text.find("[calendar]\nstandup at 10").unwrap();
        let tasks = text.find("[tasks]\nfile taxes").unwrap();
        assert!(cal < tasks);
        assert!(text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_failing_provider_leaves_marker_and_others_contribute() {
        let mut asm = assembler(vec![
            BoxContextProvider::new(FailingProvider::new("email")),
            BoxContextProvider::new(FixedProvider::new("tasks", "buy milk")),
        ]);

        let text = asm.assemble(None, fixed_now()).await;
        assert!(text.contains("[email] unavailable:"));
        assert!(text.contains("[tasks]\nbuy milk"));

        let status = asm.status();
        assert_eq!(status[0].name, "email");
        assert!(status[0].last_updated.is_none());
        assert_eq!(status[1].last_updated, Some(fixed_now()));
    }

    #[tokio::test]
    async fn test_empty_block_is_skipped_but_counts_as_update() {
        let mut asm = assembler(vec![BoxContextProvider::new(FixedProvider::new("inbox", ""))]);

        let text = asm.assemble(None, fixed_now()).await;
        assert!(!text.contains("[inbox]"));
        assert!(asm.status()[0].last_updated.is_some());
    }

    #[tokio::test]
    async fn test_selection_restricts_fetch() {
        let mut asm = assembler(vec![
            BoxContextProvider::new(FixedProvider::new("calendar", "c")),
            BoxContextProvider::new(FixedProvider::new("tasks", "t")),
        ]);

        let only_tasks = vec!["tasks".to_string()];
        let text = asm.assemble(Some(&only_tasks), fixed_now()).await;
        assert!(!text.contains("[calendar]"));
        assert!(text.contains("[tasks]\nt"));
    }

    #[tokio::test]
    async fn test_no_providers_yields_timestamp_only() {
        let mut asm = ContextAssembler::new();
        let text = asm.assemble(None, fixed_now()).await;
        assert_eq!(text, format!("{}\n\n", timestamp_line(fixed_now())));
        assert!(asm.names().is_empty());
    }
}
