//! Advocate directory view state
//!
//! Ties the loader, the search controller and the filter engine together.
//! The displayed list is a set of indices into the canonical list, so it can
//! only ever hold records that were fetched, in the order they were fetched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::advocate::Advocate;
use crate::filter::{matching_indices, MatchRules};
use crate::highlight::Highlighter;
use crate::loader::{self, AdvocateSource, LoadEvent, LoadHandle};
use crate::search::{SearchAction, SearchController, SearchEvent};

/// Lifecycle of the one fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    FetchFailed(String),
}

pub struct DirectoryView {
    load_state: LoadState,
    canonical: Vec<Advocate>,
    displayed: Vec<usize>,
    /// Query the displayed list was computed from
    applied_query: String,
    /// Compiled once per applied query, reused by every frame
    highlighter: Option<Highlighter>,
    search: SearchController,
    rules: MatchRules,
    loader: Option<LoadHandle>,
}

impl DirectoryView {
    pub fn new(quiet_period: Duration, rules: MatchRules) -> Self {
        Self {
            load_state: LoadState::Idle,
            canonical: Vec::new(),
            displayed: Vec::new(),
            applied_query: String::new(),
            highlighter: None,
            search: SearchController::new(quiet_period),
            rules,
            loader: None,
        }
    }

    /// Start the initial fetch. Only the first call has any effect.
    pub fn activate(&mut self, source: Arc<dyn AdvocateSource>) {
        if self.load_state != LoadState::Idle {
            debug!("ignoring activation in state {:?}", self.load_state);
            return;
        }
        self.loader = Some(loader::spawn(source));
        self.load_state = LoadState::Loading;
    }

    /// Drain the loader's outcome, if it has arrived. Returns true when the
    /// view changed.
    pub fn poll_loader(&mut self) -> bool {
        let Some(handle) = &self.loader else {
            return false;
        };
        let Some(event) = handle.try_recv() else {
            return false;
        };
        self.loader = None;

        match event {
            LoadEvent::Loaded(list) => self.finish_loading(list),
            LoadEvent::Failed(reason) => self.fail_loading(reason),
        }
        true
    }

    /// Record a failed fetch. The view stays empty.
    pub fn fail_loading(&mut self, reason: String) {
        info!("Directory load failed: {reason}");
        self.load_state = LoadState::FetchFailed(reason);
    }

    /// Store a fetched list as both canonical and displayed list.
    pub fn finish_loading(&mut self, list: Vec<Advocate>) {
        self.canonical = list;
        self.show_all();
        self.load_state = LoadState::Loaded;

        // A pass that already ran while loading saw an empty list; redo it.
        // A pass still inside its quiet period is left to `tick`.
        if !self.search.query().is_empty() && !self.search.has_pending() {
            self.apply_filter(self.search.query().to_string());
        }
    }

    pub fn handle(&mut self, event: SearchEvent, now: Instant) {
        match self.search.handle(event, now) {
            SearchAction::ShowAll => self.show_all(),
            SearchAction::Filter(query) => self.apply_filter(query),
            SearchAction::Scheduled { due } => {
                debug!("filter pass for '{}' due in {:?}", self.search.query(), due - now);
            }
        }
    }

    /// Run the pending filter pass if its quiet period is over. Returns true
    /// when the displayed list was recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(SearchAction::Filter(query)) => {
                self.apply_filter(query);
                true
            }
            _ => false,
        }
    }

    fn show_all(&mut self) {
        self.displayed = (0..self.canonical.len()).collect();
        self.applied_query.clear();
        self.highlighter = None;
    }

    fn apply_filter(&mut self, query: String) {
        self.displayed = matching_indices(&self.canonical, &query, &self.rules);
        debug!(
            "filter '{query}' kept {} of {} advocates",
            self.displayed.len(),
            self.canonical.len()
        );
        if query != self.applied_query || self.highlighter.is_none() {
            self.highlighter = Highlighter::new(&query);
        }
        self.applied_query = query;
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    pub fn canonical(&self) -> &[Advocate] {
        &self.canonical
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn displayed(&self) -> impl Iterator<Item = &Advocate> + '_ {
        self.displayed.iter().map(|&idx| &self.canonical[idx])
    }

    /// The `position`-th displayed record
    pub fn displayed_at(&self, position: usize) -> Option<&Advocate> {
        self.displayed
            .get(position)
            .and_then(|&idx| self.canonical.get(idx))
    }

    /// Current normalized query text
    pub fn query(&self) -> &str {
        self.search.query()
    }

    /// Query the displayed list reflects; this is what gets highlighted.
    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    /// Highlighter for [`Self::applied_query`], `None` when nothing is applied
    pub fn highlighter(&self) -> Option<&Highlighter> {
        self.highlighter.as_ref()
    }

    pub fn has_pending_search(&self) -> bool {
        self.search.has_pending()
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }
}
