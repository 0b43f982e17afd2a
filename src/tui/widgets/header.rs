use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use taqwim::models::DayRecord;
use taqwim::utils::hijri::hijri_month_name;

use crate::tui::theme;

fn hijri_label(record: Option<&DayRecord>, lang: &str) -> String {
    match record {
        Some(r) => {
            let name = if r.hijri.month_name.is_empty() {
                hijri_month_name(r.hijri.month, lang).to_string()
            } else {
                r.hijri.month_name.clone()
            };
            format!("{} {} {}", r.hijri.day, name, r.hijri.year)
        }
        // The Hijri date is only known from an imported backend record
        None => "Hijri date unavailable".to_string(),
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    location: &str,
    today_record: Option<&DayRecord>,
    today: NaiveDate,
    lang: &str,
) {
    let gregorian_str = today.format("%A, %b %d, %Y").to_string();
    let hijri_str = hijri_label(today_record, lang);

    let title_line = Line::from(vec![
        Span::styled("  تقويم  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("taqwim", theme::gold()),
        Span::styled(format!("  ·  {}", location), theme::dim()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(hijri_str, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian_str, theme::dim()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
