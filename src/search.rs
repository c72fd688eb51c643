//! Search controller
//!
//! Owns the normalized query and the single pending (debounced) filter pass.
//! Time is passed in by the caller, which polls the controller from its event
//! loop; nothing here sleeps or spawns.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::filter::normalize;

/// Default quiet period before a filter pass runs
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// User input reaching the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search input now holds this raw text
    QueryChanged(String),
    /// The reset action was triggered
    Reset,
}

/// What the owner must do in response to an event or a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Show the full canonical list right now
    ShowAll,
    /// A pass was scheduled; keep polling
    Scheduled { due: Instant },
    /// Run a filter pass for this normalized query now
    Filter(String),
}

#[derive(Debug, Clone)]
struct PendingPass {
    query: String,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    query: String,
    pending: Option<PendingPass>,
    quiet_period: Duration,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SearchController {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            query: String::new(),
            pending: None,
            quiet_period,
        }
    }

    /// Current normalized query; empty means no filter.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending pass becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn handle(&mut self, event: SearchEvent, now: Instant) -> SearchAction {
        // Every event supersedes whatever was scheduled before it
        if let Some(stale) = self.pending.take() {
            debug!("cancelled pending filter pass for '{}'", stale.query);
        }

        match event {
            SearchEvent::QueryChanged(raw) => {
                self.query = normalize(&raw);
                if self.query.is_empty() {
                    return SearchAction::ShowAll;
                }

                let due = now + self.quiet_period;
                self.pending = Some(PendingPass {
                    query: self.query.clone(),
                    due,
                });
                SearchAction::Scheduled { due }
            }
            SearchEvent::Reset => {
                self.query.clear();
                SearchAction::ShowAll
            }
        }
    }

    /// Fires the pending pass once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchAction> {
        if !self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return None;
        }
        self.pending
            .take()
            .map(|pending| SearchAction::Filter(pending.query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn changed(text: &str) -> SearchEvent {
        SearchEvent::QueryChanged(text.to_string())
    }

    #[test]
    fn input_is_normalized_and_scheduled() {
        let t0 = Instant::now();
        let mut search = SearchController::default();

        let action = search.handle(changed("  AuSt "), t0);
        assert_eq!(action, SearchAction::Scheduled { due: t0 + ms(500) });
        assert_eq!(search.query(), "aust");
        assert_eq!(search.poll(t0 + ms(499)), None);
        assert_eq!(
            search.poll(t0 + ms(500)),
            Some(SearchAction::Filter("aust".to_string()))
        );
        assert_eq!(search.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn keystrokes_inside_the_window_collapse_to_the_last() {
        let t0 = Instant::now();
        let mut search = SearchController::default();

        search.handle(changed("b"), t0);
        search.handle(changed("bo"), t0 + ms(100));
        search.handle(changed("bos"), t0 + ms(200));

        let fired: Vec<_> = (0..=20)
            .filter_map(|step| search.poll(t0 + ms(step * 50)))
            .collect();
        assert_eq!(fired, vec![SearchAction::Filter("bos".to_string())]);
    }

    #[test]
    fn empty_query_shows_all_without_waiting() {
        let t0 = Instant::now();
        let mut search = SearchController::default();

        search.handle(changed("bos"), t0);
        assert_eq!(search.handle(changed("   "), t0 + ms(10)), SearchAction::ShowAll);
        assert!(!search.has_pending());
        assert_eq!(search.poll(t0 + ms(600)), None);
    }

    #[test]
    fn reset_cancels_pending_pass() {
        let t0 = Instant::now();
        let mut search = SearchController::default();

        search.handle(changed("bos"), t0);
        assert_eq!(search.handle(SearchEvent::Reset, t0 + ms(100)), SearchAction::ShowAll);
        assert_eq!(search.query(), "");
        assert_eq!(search.next_deadline(), None);
        assert_eq!(search.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn custom_quiet_period() {
        let t0 = Instant::now();
        let mut search = SearchController::new(ms(50));
        search.handle(changed("x"), t0);
        assert_eq!(search.next_deadline(), Some(t0 + ms(50)));
        assert!(search.poll(t0 + ms(50)).is_some());
    }
}
