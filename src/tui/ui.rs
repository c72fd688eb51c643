use crate::advocate::Advocate;
use crate::highlight::Highlighter;
use crate::tui::app::App;
use crate::tui::colors;
use crate::view::LoadState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use unicode_width::UnicodeWidthStr;

const SEARCH_PREFIX: &str = " \u{1F50D} ";

const HEADERS: [&str; 7] = [
    "First Name",
    "Last Name",
    "City",
    "Degree",
    "Specialties",
    "Experience",
    "Phone Number",
];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title(frame, chunks[0]);

    match app.view.load_state().clone() {
        LoadState::Idle | LoadState::Loading => {
            draw_message(frame, chunks[2], "Loading...", Style::default().fg(Color::Gray));
        }
        LoadState::FetchFailed(reason) => {
            let text = format!("Could not load advocates: {reason}\n\nPress q to quit.");
            draw_message(frame, chunks[2], &text, Style::default().fg(Color::LightRed));
        }
        LoadState::Loaded => {
            draw_search_bar(frame, app, chunks[1]);
            draw_table(frame, app, chunks[2]);

            if app.search.focused {
                // Border (1) + prefix, then the text up to the cursor
                let prefix = SEARCH_PREFIX.width() as u16;
                let cursor_x = chunks[1].x + 1 + prefix + app.search.cursor_column();
                let cursor_y = chunks[1].y + 1;
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }
    }

    draw_status_bar(frame, app, chunks[3]);
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(" Advocate Directory")
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    frame.render_widget(title, area);
}

fn draw_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text.to_string())
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search by keyword ")
        .title_bottom(" Ctrl+R: Reset search ");

    let search_text = format!("{SEARCH_PREFIX}{}", app.search.text);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// A cell's text as spans, with occurrences of the term highlighted
fn highlighted(text: &str, highlighter: Option<&Highlighter>, base: Style) -> Vec<Span<'static>> {
    match highlighter {
        Some(h) => h
            .segments(text)
            .into_iter()
            .map(|segment| {
                let style = if segment.matched {
                    colors::highlight(base)
                } else {
                    base
                };
                Span::styled(segment.text.to_string(), style)
            })
            .collect(),
        None => vec![Span::styled(text.to_string(), base)],
    }
}

fn specialties_line(
    advocate: &Advocate,
    highlighter: Option<&Highlighter>,
    base: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, specialty) in advocate.specialties.iter().enumerate() {
        let bullet = if i == 0 { "\u{2022} " } else { "  \u{2022} " };
        spans.push(Span::styled(bullet, base));
        spans.extend(highlighted(specialty, highlighter, base));
    }
    Line::from(spans)
}

fn advocate_row(
    advocate: &Advocate,
    highlighter: Option<&Highlighter>,
    highlight_phone: bool,
    bg: Color,
    modifier: Modifier,
) -> Row<'static> {
    let style = |column: usize| {
        Style::default()
            .fg(colors::column_fg(column))
            .bg(bg)
            .add_modifier(modifier)
    };

    let years = advocate.years_of_experience.to_string();
    let phone = advocate.phone_number.to_string();
    let phone_highlighter = if highlight_phone { highlighter } else { None };

    let cells = vec![
        Cell::from(Line::from(highlighted(&advocate.first_name, highlighter, style(0)))),
        Cell::from(Line::from(highlighted(&advocate.last_name, highlighter, style(1)))),
        Cell::from(Line::from(highlighted(&advocate.city, highlighter, style(2)))),
        Cell::from(Line::from(highlighted(&advocate.degree, highlighter, style(3)))),
        Cell::from(specialties_line(advocate, highlighter, style(4))),
        Cell::from(Line::from(highlighted(&years, highlighter, style(5)))),
        Cell::from(Line::from(highlighted(&phone, phone_highlighter, style(6)))),
    ];

    Row::new(cells).style(Style::default().bg(bg))
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    // Area height minus header
    let table_inner_height = area.height.saturating_sub(1) as usize;
    app.table.visible_rows = table_inner_height;

    let header = Row::new(
        HEADERS
            .iter()
            .map(|name| Cell::from(*name).style(colors::header())),
    )
    .height(1);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(13),
    ];

    let total = app.view.displayed_len();
    if total == 0 {
        frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), area);
        let message_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        let message = Paragraph::new(" No result found.").style(Style::default().fg(Color::Gray));
        frame.render_widget(message, message_area);
        return;
    }

    let highlighter = app.view.highlighter();
    let highlight_phone = app.view.rules().match_phone;

    // Build visible rows only
    let start = app.table.scroll_offset;
    let end = (start + table_inner_height).min(total);

    let rows: Vec<Row> = (start..end)
        .enumerate()
        .filter_map(|(visual_idx, logical_idx)| {
            let advocate = app.view.displayed_at(logical_idx)?;
            let is_selected = app.table.selected == Some(logical_idx);
            let modifier = if is_selected && !app.search.focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };
            Some(advocate_row(
                advocate,
                highlighter,
                highlight_phone,
                colors::row_bg(is_selected, visual_idx),
                modifier,
            ))
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(table, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.view.load_state() {
        LoadState::Idle | LoadState::Loading => " \u{23F3} Loading advocates...".to_string(),
        LoadState::FetchFailed(_) => " Load failed".to_string(),
        LoadState::Loaded if app.view.has_pending_search() => format!(
            " Searching '{}'... | {} of {} advocates",
            app.view.query(),
            app.view.displayed_len(),
            app.view.canonical().len()
        ),
        LoadState::Loaded => format!(
            " {} of {} advocates",
            app.view.displayed_len(),
            app.view.canonical().len()
        ),
    };

    let right_text = " Tab:Focus  \u{2191}\u{2193}:Move  Ctrl+R:Reset  Esc:Clear/Quit  Ctrl+Q:Quit ";

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::jane_and_bob;
    use crate::filter::MatchRules;
    use crate::search::{SearchEvent, DEFAULT_QUIET_PERIOD};
    use crate::view::DirectoryView;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::time::Instant;

    const WIDTH: u16 = 120;
    const HEIGHT: u16 = 12;

    fn searched_app(rules: MatchRules, query: &str) -> App {
        let mut view = DirectoryView::new(DEFAULT_QUIET_PERIOD, rules);
        view.finish_loading(jane_and_bob());
        let t0 = Instant::now();
        view.handle(SearchEvent::QueryChanged(query.to_string()), t0);
        view.tick(t0 + DEFAULT_QUIET_PERIOD);
        App::with_view(view)
    }

    fn render(app: &mut App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Top-left cell of the first occurrence of `text`, one cell per char
    fn find(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
        let chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
        for y in 0..HEIGHT {
            for x in 0..WIDTH.saturating_sub(chars.len() as u16 - 1) {
                let hit = chars
                    .iter()
                    .enumerate()
                    .all(|(i, c)| buffer[(x + i as u16, y)].symbol() == c.as_str());
                if hit {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn is_highlighted(buffer: &Buffer, x: u16, y: u16) -> bool {
        buffer[(x, y)].bg == Color::Yellow
    }

    #[test]
    fn matched_text_is_highlighted_in_row() {
        let mut app = searched_app(MatchRules::default(), "aust");
        let buffer = render(&mut app);

        let (x, y) = find(&buffer, "Austin").expect("Austin rendered");
        assert!((0..4).all(|i| is_highlighted(&buffer, x + i, y)));
        assert!(!is_highlighted(&buffer, x + 4, y));
        assert!(find(&buffer, "Boston").is_none());

        let (x, y) = find(&buffer, "Jane").unwrap();
        assert!(!is_highlighted(&buffer, x, y));
    }

    #[test]
    fn empty_result_shows_message() {
        let mut app = searched_app(MatchRules::default(), "zzz");
        let buffer = render(&mut app);

        assert!(find(&buffer, "No result found.").is_some());
        assert!(find(&buffer, "First Name").is_some());
    }

    #[test]
    fn fetch_failure_shows_reason() {
        let mut view = DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default());
        view.fail_loading("request timed out".to_string());
        let mut app = App::with_view(view);
        let buffer = render(&mut app);

        assert!(find(&buffer, "Could not load advocates: request timed out").is_some());
        assert!(find(&buffer, "Press q to quit.").is_some());
        assert!(find(&buffer, "First Name").is_none());
    }

    #[test]
    fn loading_state_shows_placeholder() {
        let mut app = App::with_view(DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default()));
        let buffer = render(&mut app);
        assert!(find(&buffer, "Loading...").is_some());
    }

    #[test]
    fn phone_column_highlighted_only_when_searched() {
        let mut app = searched_app(MatchRules::default(), "5");
        let buffer = render(&mut app);
        let (x, y) = find(&buffer, "5551234567").expect("phone rendered");
        assert!(!is_highlighted(&buffer, x, y));

        let with_phone = MatchRules {
            match_phone: true,
            ..MatchRules::default()
        };
        let mut app = searched_app(with_phone, "555");
        let buffer = render(&mut app);
        let (x, y) = find(&buffer, "5551234567").expect("phone rendered");
        assert!((0..3).all(|i| is_highlighted(&buffer, x + i, y)));
        assert!(!is_highlighted(&buffer, x + 3, y));
    }

    #[test]
    fn status_bar_fits_wide_glyphs() {
        let mut app = App::with_view(DirectoryView::new(DEFAULT_QUIET_PERIOD, MatchRules::default()));
        let buffer = render(&mut app);

        // Right-hand help text ends with "Quit " flush against the edge
        assert_eq!(buffer[(WIDTH - 1, HEIGHT - 1)].symbol(), " ");
        assert_eq!(buffer[(WIDTH - 2, HEIGHT - 1)].symbol(), "t");
    }
}
