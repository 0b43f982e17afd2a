use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use taqwim::models::ResolvedWindowState;
use taqwim::utils::format::format_time_12;

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &ResolvedWindowState, lang: &str) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let label = match state.next {
        Some(next) => Line::from(vec![
            Span::styled(
                next.key.display_name().to_uppercase(),
                theme::gold().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  at {}", format_time_12(next.instant.time(), lang)),
                theme::dim(),
            ),
        ]),
        None => Line::from(Span::styled("No data", theme::dim())),
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), label]).alignment(Alignment::Center),
        chunks[0],
    );

    let countdown = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::amber().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .lines(vec![state.countdown().into()])
        .build();
    frame.render_widget(countdown, chunks[1]);

    if let Some(current) = state.current {
        let gauge = Gauge::default()
            .gauge_style(theme::gauge())
            .ratio(state.progress_fraction.clamp(0.0, 1.0))
            .label(Span::styled(
                format!(
                    "{} {:.0}%",
                    current.key.display_name(),
                    state.progress_fraction * 100.0
                ),
                theme::bold(),
            ));
        frame.render_widget(gauge, chunks[2]);
    }
}
