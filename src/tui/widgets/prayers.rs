use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use taqwim::models::{DayRecord, PrayerKey, ResolvedWindowState};
use taqwim::utils::format::{format_12_hour, pad};

use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    record: Option<&DayRecord>,
    window: Option<&ResolvedWindowState>,
    lang: &str,
) {
    let block = Block::default()
        .title(Span::styled(" Prayer Times ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(record) = record else {
        let items = vec![
            ListItem::new(Line::from("")),
            ListItem::new(Line::from(Span::styled("  No data", theme::dim()))),
        ];
        frame.render_widget(List::new(items).block(block), area);
        return;
    };

    let current = window.and_then(|w| w.current).map(|w| w.key);
    let next = window.and_then(|w| w.next).map(|w| w.key);

    let items: Vec<ListItem> = PrayerKey::all()
        .into_iter()
        .map(|key| {
            let time_str = format_12_hour(record.prayer_times.get(key), lang);
            let is_current = current == Some(key);

            let (icon, icon_style) = if is_current {
                ("▶", theme::amber())
            } else if next == Some(key) {
                ("›", theme::green())
            } else {
                (" ", theme::dim())
            };

            let name_style = if is_current {
                theme::amber().add_modifier(Modifier::BOLD)
            } else if key.is_prayer() {
                theme::bold()
            } else {
                theme::dim()
            };

            let line = Line::from(vec![
                Span::styled(format!(" {} ", icon), icon_style),
                Span::styled(pad(key.display_name(), 9, false), name_style),
                Span::styled(pad(&time_str, 9, true), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
