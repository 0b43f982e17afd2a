use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use taqwim::models::CalendarSystem;
use taqwim::utils::locale;

use crate::tui::theme;

const KEY_HINTS: [(&str, &str); 8] = [
    ("←→↑↓", "select"),
    ("Enter", "day"),
    ("[ ]", "month"),
    ("c", "calendar"),
    ("t", "today"),
    ("l", "language"),
    ("?", "help"),
    ("Esc", "quit"),
];

pub fn render(frame: &mut Frame, area: Rect, system: CalendarSystem, lang: &str) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)])
        .split(area);

    let row = locale::locale(lang);
    let direction = if row.rtl { "rtl" } else { "ltr" };
    let status = Line::from(vec![
        Span::styled(format!(" {}", system), theme::amber()),
        Span::styled(format!(" · {} {}", row.code, direction), theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[0]);

    let spans: Vec<Span> = KEY_HINTS
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!("[{}]", key), theme::gold()),
                Span::styled(format!(" {}  ", label), theme::dim()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}
