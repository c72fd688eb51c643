use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crate::view::DirectoryView;
use crate::{AppConfig, SearchEvent};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::info;

pub struct App {
    pub view: DirectoryView,

    // Sub-states
    pub search: SearchState,
    pub table: TableState,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    /// Build the app and start the one fetch.
    pub fn new(config: &AppConfig) -> Self {
        let mut view = DirectoryView::new(config.quiet_period, config.rules);
        view.activate(config.source());
        Self::with_view(view)
    }

    pub fn with_view(view: DirectoryView) -> Self {
        let mut app = Self {
            view,
            search: SearchState::default(),
            table: TableState::default(),
            should_quit: false,
        };
        app.table.reset(app.view.displayed_len());
        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.on_tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                info!("Quit requested");
                return Ok(());
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        let loaded = self.view.poll_loader();
        let filtered = self.view.tick(now);
        if loaded || filtered {
            self.table.reset(self.view.displayed_len());
        }
    }

    fn send(&mut self, event: SearchEvent, now: Instant) {
        self.view.handle(event, now);
        // Empty queries and resets take effect right away
        if !self.view.has_pending_search() {
            self.table.reset(self.view.displayed_len());
        }
    }

    fn reset_search(&mut self, now: Instant) {
        self.search.clear();
        self.send(SearchEvent::Reset, now);
    }

    fn query_changed(&mut self, now: Instant) {
        let text = self.search.text.clone();
        self.send(SearchEvent::QueryChanged(text), now);
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if ctrl => {
                self.reset_search(now);
                return;
            }
            KeyCode::Esc => {
                if !self.search.text.is_empty() {
                    self.reset_search(now);
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        // Nothing to search or browse until the list is in
        if !self.view.is_loaded() {
            if let KeyCode::Char('q') = key.code {
                self.should_quit = true;
            }
            return;
        }

        if self.search.focused {
            self.handle_search_key(key, now);
        } else {
            self.handle_table_key(key, now);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.query_changed(now);
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.query_changed(now);
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.query_changed(now);
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent, now: Instant) {
        let total = self.view.displayed_len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(total),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert(c);
                self.query_changed(now);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::jane_and_bob;
    use crate::filter::MatchRules;
    use crate::search::DEFAULT_QUIET_PERIOD;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn loaded_app() -> App {
        let mut view = DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default());
        view.finish_loading(jane_and_bob());
        App::with_view(view)
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
    }

    fn displayed_ids(app: &App) -> Vec<u64> {
        app.view.displayed().map(|a| a.id).collect()
    }

    #[test]
    fn typing_filters_after_quiet_period() {
        let t0 = Instant::now();
        let mut app = loaded_app();

        type_text(&mut app, "Bos", t0);
        assert_eq!(app.search.text, "Bos");
        app.on_tick(t0 + ms(100));
        assert_eq!(displayed_ids(&app), vec![1, 2]);

        app.on_tick(t0 + ms(500));
        assert_eq!(displayed_ids(&app), vec![2]);
        assert_eq!(app.table.selected, Some(0));
    }

    #[test]
    fn ctrl_r_resets_before_the_pass_fires() {
        let t0 = Instant::now();
        let mut app = loaded_app();

        type_text(&mut app, "bos", t0);
        app.handle_key(ctrl('r'), t0 + ms(100));
        app.on_tick(t0 + ms(1000));

        assert_eq!(app.search.text, "");
        assert_eq!(displayed_ids(&app), vec![1, 2]);
    }

    #[test]
    fn escape_resets_then_quits() {
        let t0 = Instant::now();
        let mut app = loaded_app();

        type_text(&mut app, "x", t0);
        app.handle_key(key(KeyCode::Esc), t0);
        assert!(!app.should_quit);
        assert_eq!(app.search.text, "");

        app.handle_key(key(KeyCode::Esc), t0);
        assert!(app.should_quit);
    }

    #[test]
    fn backspace_to_empty_restores_immediately() {
        let t0 = Instant::now();
        let mut app = loaded_app();

        type_text(&mut app, "b", t0);
        app.on_tick(t0 + ms(500));
        assert_eq!(displayed_ids(&app), vec![2]);

        app.handle_key(key(KeyCode::Backspace), t0 + ms(600));
        assert_eq!(displayed_ids(&app), vec![1, 2]);
    }

    #[test]
    fn typing_from_table_refocuses_search() {
        let t0 = Instant::now();
        let mut app = loaded_app();

        app.handle_key(key(KeyCode::Tab), t0);
        assert!(!app.search.focused);
        app.handle_key(key(KeyCode::Down), t0);
        assert_eq!(app.table.selected, Some(1));

        app.handle_key(key(KeyCode::Char('n')), t0);
        assert!(app.search.focused);
        assert_eq!(app.search.text, "n");
    }

    #[test]
    fn input_ignored_while_loading() {
        let view = DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default());
        let mut app = App::with_view(view);

        app.handle_key(key(KeyCode::Char('a')), Instant::now());
        assert_eq!(app.search.text, "");
        app.handle_key(key(KeyCode::Char('q')), Instant::now());
        assert!(app.should_quit);
    }
}
