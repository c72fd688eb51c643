//! Interactive advocate table
//!
//! Search bar on top, table of the displayed advocates below, status line at
//! the bottom. The event loop ticks every 50 ms; each tick drains the loader
//! and runs a filter pass once its quiet period is over.

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

pub use app::App;

use crate::AppConfig;

/// Take over the terminal and run until the user quits.
pub fn run(config: &AppConfig) -> crate::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let mut app = App::new(config);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
