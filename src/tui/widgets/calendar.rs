use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use taqwim::calendar::weekday_headers;
use taqwim::models::CalendarCell;
use taqwim::month::MonthData;
use taqwim::utils::format::pad;
use taqwim::utils::locale::is_rtl;

use crate::tui::theme;

const CELL_WIDTH: usize = 5;

fn cell_style(cell: &CalendarCell) -> Style {
    if cell.is_selected {
        theme::selected()
    } else if cell.is_today {
        theme::today()
    } else if !cell.is_current_month {
        theme::padding_day()
    } else {
        theme::bold()
    }
}

fn cell_span(cell: &CalendarCell) -> Span<'static> {
    let label = match (cell.day_number, cell.is_today) {
        (0, _) => String::new(),
        (n, true) => format!("•{}", n),
        (n, false) => n.to_string(),
    };
    Span::styled(pad(&label, CELL_WIDTH - 1, true) + " ", cell_style(cell))
}

pub fn render(frame: &mut Frame, area: Rect, month: &MonthData, lang: &str) {
    let rtl = is_rtl(lang);
    let grid = &month.grid;

    let title = format!(" {} · {} ", month.title(lang), grid.system);
    let block = Block::default()
        .title(Span::styled(title, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let mut headers: Vec<Span> = weekday_headers(lang)
        .iter()
        .map(|h| Span::styled(pad(h, CELL_WIDTH - 1, true) + " ", theme::dim()))
        .collect();
    if rtl {
        headers.reverse();
    }

    let mut lines = vec![Line::from(""), Line::from(headers), Line::from("")];
    for row in grid.rows() {
        let mut spans: Vec<Span> = row.iter().map(cell_span).collect();
        if rtl {
            spans.reverse();
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if grid.is_fallback {
        lines.push(Line::from(Span::styled(
            "No data for this month · import it with `taqwim import`",
            theme::dim(),
        )));
    } else if let Some(cell) = grid.selected() {
        let detail = cell
            .source
            .as_ref()
            .map(|r| {
                let other = match grid.system {
                    taqwim::models::CalendarSystem::Hijri => &r.gregorian,
                    taqwim::models::CalendarSystem::Gregorian => &r.hijri,
                };
                let name = if other.month_name.is_empty() {
                    format!("{}/{}", other.month, other.year)
                } else {
                    format!("{} {}", other.month_name, other.year)
                };
                format!("{} · {} {}", r.parts(grid.system).day_name, other.day, name)
            })
            .unwrap_or_else(|| "--".to_string());
        lines.push(Line::from(Span::styled(
            detail,
            theme::amber().add_modifier(Modifier::ITALIC),
        )));
    }

    let alignment = if rtl {
        Alignment::Right
    } else {
        Alignment::Center
    };
    let paragraph = Paragraph::new(lines).block(block).alignment(alignment);
    frame.render_widget(paragraph, area);
}
