use ratatui::style::{Color, Modifier, Style};

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const ODD_ROW_BG: Color = Color::Rgb(25, 25, 35);

pub fn header() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(BAR_BG)
        .add_modifier(Modifier::BOLD)
}

/// Background for a table row
pub fn row_bg(is_selected: bool, visual_idx: usize) -> Color {
    if is_selected {
        SELECTED_BG
    } else if visual_idx % 2 == 1 {
        ODD_ROW_BG
    } else {
        Color::Reset
    }
}

/// Matched text inside a cell
pub fn highlight(base: Style) -> Style {
    base.fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Text color for each column, in display order
pub fn column_fg(column: usize) -> Color {
    match column {
        0 | 1 => Color::White,
        2 => Color::LightBlue,
        3 => Color::Green,
        4 => Color::Gray,
        5 => Color::Yellow,
        _ => Color::DarkGray,
    }
}
