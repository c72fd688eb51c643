//! Advocates - searchable advocate directory
//!
//! Fetches the advocate list once and filters it locally as the user types.
//!
//! # Features
//!
//! - **One fetch**: the full list comes from `GET /api/advocates` (or a JSON file)
//! - **Debounced search**: a filter pass runs after 500 ms without input
//! - **Substring matching**: case-insensitive over names, city, degree,
//!   specialties and years of experience
//! - **Literal highlighting**: matched text is highlighted, never interpreted
//!   as a pattern
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Instant;
//! use advocates::{DirectoryView, HttpSource, MatchRules, SearchEvent};
//! use advocates::search::DEFAULT_QUIET_PERIOD;
//!
//! let mut view = DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default());
//! view.activate(Arc::new(HttpSource::new("http://localhost:3000/api/advocates")));
//!
//! while !view.poll_loader() {
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//!
//! view.handle(SearchEvent::QueryChanged("cardio".into()), Instant::now());
//! view.tick(Instant::now() + DEFAULT_QUIET_PERIOD);
//! for advocate in view.displayed() {
//!     println!("{}", advocate.full_name());
//! }
//! ```

pub mod advocate;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod loader;
pub mod logging;
pub mod search;
pub mod tui;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// Re-export main types
pub use advocate::{Advocate, AdvocatesResponse};
pub use error::{DirectoryError, Result};
pub use filter::{filter, filter_with, MatchRules, SpecialtyMatch};
pub use highlight::{highlight, Highlighter, Segment};
pub use loader::{AdvocateSource, FileSource, HttpSource, LoadEvent};
pub use search::{SearchAction, SearchController, SearchEvent};
pub use view::{DirectoryView, LoadState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Advocate API endpoint
    pub endpoint: String,
    /// Read the advocate envelope from this file instead of the endpoint
    pub file: Option<PathBuf>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Quiet period before a filter pass runs
    pub quiet_period: Duration,
    /// Fields taking part in matching
    pub rules: MatchRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: loader::DEFAULT_ENDPOINT.to_string(),
            file: None,
            timeout: Duration::from_secs(10),
            quiet_period: search::DEFAULT_QUIET_PERIOD,
            rules: MatchRules::default(),
        }
    }
}

impl AppConfig {
    /// The advocate source this configuration points at
    pub fn source(&self) -> Arc<dyn AdvocateSource> {
        match &self.file {
            Some(path) => Arc::new(FileSource::new(path.clone())),
            None => Arc::new(HttpSource::new(self.endpoint.clone()).with_timeout(self.timeout)),
        }
    }
}
