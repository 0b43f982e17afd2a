use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use taqwim::config::AppConfig;
use taqwim::models::{CalendarSystem, DateRef, DayRecord, MonthKey, ResolvedWindowState, WEEK_LEN};
use taqwim::month::{self, MonthData};
use taqwim::prayer_times::resolve;
use taqwim::utils::locale;

use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{calendar, header, next_prayer, prayers, statusbar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub should_quit: bool,
    pub system: CalendarSystem,

    // Refreshed on load / navigation
    pub today: DateRef,
    pub today_record: Option<DayRecord>,
    pub month: MonthData,
    pub show_day_detail: bool,

    // Refreshed every tick; the only state the countdown owns
    pub window: ResolvedWindowState,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let today = Local::now().date_naive();
        let system = config.display.calendar;
        App {
            view: View::Dashboard,
            config,
            should_quit: false,
            system,
            today: DateRef::gregorian(today),
            today_record: None,
            month: MonthData {
                key: None,
                records: Vec::new(),
                grid: taqwim::calendar::fallback_grid(system),
            },
            show_day_detail: false,
            window: ResolvedWindowState::empty(),
        }
    }

    pub fn lang(&self) -> &str {
        &self.config.display.language
    }

    fn location(&self) -> &str {
        &self.config.location.name
    }

    /// Reload today's record and jump to the month containing today.
    pub fn load(&mut self, conn: &Connection, date: NaiveDate) -> Result<()> {
        let (today, record) = month::today_ref(conn, self.location(), date)?;
        self.today = today;
        self.today_record = record;
        let key = month::default_month(
            conn,
            self.location(),
            self.system,
            self.today_record.as_ref(),
            date,
        )?;
        self.show_month(conn, key)
    }

    fn show_month(&mut self, conn: &Connection, key: Option<MonthKey>) -> Result<()> {
        self.month = month::load_month(
            conn,
            &self.config.location.name,
            &self.config.corrections,
            key,
            self.system,
            &self.today,
        )?;
        let start = self
            .month
            .grid
            .today_index()
            .unwrap_or(self.month.grid.leading);
        self.month.grid.select(start);
        self.show_day_detail = false;
        Ok(())
    }

    pub fn tick(&mut self, conn: &Connection, now: NaiveDateTime) {
        if now.date() != self.today.gregorian {
            if let Err(e) = self.load(conn, now.date()) {
                log::warn!("Reloading for new day failed: {}", e);
            }
        }
        self.refresh_window(now);
    }

    /// Re-resolve the countdown against today's record.
    pub fn refresh_window(&mut self, now: NaiveDateTime) {
        self.window = match &self.today_record {
            Some(record) => resolve(&record.prayer_times, self.today.gregorian, now),
            None => ResolvedWindowState::empty(),
        };
    }

    /// The record whose times the prayer panel shows: the selected day, else today.
    pub fn focused_record(&self) -> Option<&DayRecord> {
        self.month
            .grid
            .selected()
            .and_then(|c| c.source.as_ref())
            .or(self.today_record.as_ref())
    }

    pub fn focused_is_today(&self) -> bool {
        match (self.focused_record(), &self.today_record) {
            (Some(f), Some(t)) => f == t,
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        // Only handle actual key presses; ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key.code, conn),
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                    self.view = View::Dashboard;
                }
            }
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode, conn: &Connection) {
        if self.show_day_detail {
            self.show_day_detail = false;
            return;
        }

        // Columns run right to left for RTL languages
        let step: isize = if locale::is_rtl(self.lang()) { -1 } else { 1 };

        match code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Left => self.move_cursor(-step),
            KeyCode::Right => self.move_cursor(step),
            KeyCode::Up => self.move_cursor(-(WEEK_LEN as isize)),
            KeyCode::Down => self.move_cursor(WEEK_LEN as isize),
            KeyCode::Enter => {
                if self.month.grid.selected().is_some() {
                    self.show_day_detail = true;
                }
            }
            KeyCode::Char('[') => self.navigate(conn, false),
            KeyCode::Char(']') => self.navigate(conn, true),
            KeyCode::Char('c') => {
                self.system = self.system.toggle();
                let date = self.today.gregorian;
                if let Err(e) = self.load(conn, date) {
                    log::warn!("Switching calendar failed: {}", e);
                }
            }
            KeyCode::Char('t') => {
                let date = self.today.gregorian;
                if let Err(e) = self.load(conn, date) {
                    log::warn!("Jumping to today failed: {}", e);
                }
            }
            KeyCode::Char('l') => {
                self.config.display.language = locale::next_language(self.lang()).to_string();
            }
            _ => {}
        }
    }

    /// Move the selection by `delta` cells, staying inside the current month.
    pub fn move_cursor(&mut self, delta: isize) {
        let range = self.month.grid.month_range();
        let Some(current) = self.month.grid.selected_index() else {
            self.month.grid.select(range.start);
            return;
        };
        let target = current as isize + delta;
        if target >= range.start as isize && target < range.end as isize {
            self.month.grid.select(target as usize);
        }
    }

    fn navigate(&mut self, conn: &Connection, forward: bool) {
        let Some(key) = self.month.key else {
            return;
        };
        let key = if forward { key.next() } else { key.prev() };
        if let Err(e) = self.show_month(conn, Some(key)) {
            log::warn!("Loading {} failed: {}", key, e);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        match self.view {
            View::Dashboard => {}
            View::Help => self.draw_help_overlay(frame),
        }
        if self.show_day_detail {
            self.draw_day_detail(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            self.location(),
            self.today_record.as_ref(),
            self.today.gregorian,
            self.lang(),
        );
        statusbar::render(frame, outer_chunks[2], self.system, self.lang());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        calendar::render(frame, columns[0], &self.month, self.lang());

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // prayers
                Constraint::Min(0),     // countdown
            ])
            .split(columns[1]);

        let window = self.focused_is_today().then_some(&self.window);
        prayers::render(
            frame,
            right_chunks[0],
            self.focused_record(),
            window,
            self.lang(),
        );
        next_prayer::render(frame, right_chunks[1], &self.window, self.lang());
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [← → ↑ ↓]    ", "Move selection"),
            ("  [Enter]      ", "Day details"),
            ("  [ [ / ] ]    ", "Previous / next month"),
            ("  [c]          ", "Switch Hijri / Gregorian"),
            ("  [t]          ", "Back to today"),
            ("  [l]          ", "Cycle language"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc]        ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (keys, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(keys, theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_day_detail(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: 12.min(area.height),
        };

        frame.render_widget(Clear, popup_area);
        let record = self.month.grid.selected().and_then(|c| c.source.as_ref());
        prayers::render(frame, popup_area, record, None, self.lang());
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let tick_ms = config.display.tick_ms.max(100);
    let mut app = App::new(config);
    app.load(&conn, Local::now().date_naive())?;
    app.refresh_window(Local::now().naive_local());

    let mut terminal = ratatui::init();
    let events = EventHandler::new(tick_ms);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Resize => {}
            Event::Tick(now) => {
                app.tick(&conn, now);
            }
        }
    }

    // Dropping the receiver stops the tick thread
    drop(events);
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveTime};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use taqwim::db::migrations::run_migrations;
    use taqwim::db::repository::DayRepo;
    use taqwim::models::{DateParts, PrayerKey, PrayerTimes};

    fn ramadan() -> Vec<DayRecord> {
        let start = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        (1..=29)
            .map(|d| {
                let g = start + Duration::days(d as i64 - 1);
                DayRecord {
                    hijri: DateParts {
                        day: d,
                        month: 9,
                        year: 1447,
                        month_name: "Ramadan".into(),
                        day_name: String::new(),
                    },
                    gregorian: DateParts {
                        day: g.day(),
                        month: g.month(),
                        year: g.year(),
                        month_name: String::new(),
                        day_name: String::new(),
                    },
                    prayer_times: PrayerTimes {
                        fajr: Some("05:10".into()),
                        sunrise: Some("06:28".into()),
                        dhuhr: Some("12:22".into()),
                        asr: Some("15:40".into()),
                        maghrib: Some("18:15".into()),
                        isha: Some("19:45".into()),
                        sunset: None,
                    },
                }
            })
            .collect()
    }

    fn setup() -> (Connection, App) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let key = MonthKey::new(CalendarSystem::Hijri, 1447, 9);
        DayRepo::store_month(&conn, "Makkah", &key, &ramadan()).unwrap();

        let mut config = AppConfig::default();
        config.display.calendar = CalendarSystem::Hijri;
        let mut app = App::new(config);
        app.load(&conn, NaiveDate::from_ymd_opt(2026, 2, 27).unwrap())
            .unwrap();
        (conn, app)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn load_selects_today() {
        let (_conn, app) = setup();
        assert_eq!(app.month.key, Some(MonthKey::new(CalendarSystem::Hijri, 1447, 9)));
        let selected = app.month.grid.selected().unwrap();
        assert!(selected.is_today);
        assert_eq!(selected.day_number, 10);
        assert!(app.focused_is_today());
    }

    #[test]
    fn cursor_moves_within_month_only() {
        let (conn, mut app) = setup();
        app.handle_key(press(KeyCode::Right), &conn);
        assert_eq!(app.month.grid.selected().unwrap().day_number, 11);
        app.handle_key(press(KeyCode::Down), &conn);
        assert_eq!(app.month.grid.selected().unwrap().day_number, 18);
        for _ in 0..10 {
            app.handle_key(press(KeyCode::Down), &conn);
        }
        assert_eq!(app.month.grid.selected().unwrap().day_number, 25);
        assert!(!app.focused_is_today());
        assert_eq!(app.month.grid.cells.iter().filter(|c| c.is_selected).count(), 1);
    }

    #[test]
    fn rtl_swaps_horizontal_keys() {
        let (conn, mut app) = setup();
        app.config.display.language = "ar".into();
        app.handle_key(press(KeyCode::Left), &conn);
        assert_eq!(app.month.grid.selected().unwrap().day_number, 11);
    }

    #[test]
    fn navigating_to_uncached_month_shows_placeholder() {
        let (conn, mut app) = setup();
        app.handle_key(press(KeyCode::Char(']')), &conn);
        assert_eq!(app.month.key, Some(MonthKey::new(CalendarSystem::Hijri, 1447, 10)));
        assert!(app.month.grid.is_fallback);
        app.handle_key(press(KeyCode::Char('[')), &conn);
        assert!(!app.month.grid.is_fallback);
    }

    #[test]
    fn toggling_system_reloads_gregorian_month() {
        let (conn, mut app) = setup();
        app.handle_key(press(KeyCode::Char('c')), &conn);
        assert_eq!(app.system, CalendarSystem::Gregorian);
        assert_eq!(app.month.key, Some(MonthKey::new(CalendarSystem::Gregorian, 2026, 2)));
        // Only a Hijri query is cached, so the Gregorian month has no records
        assert!(app.month.grid.is_fallback);
    }

    #[test]
    fn window_refresh_tracks_clock() {
        let (_conn, mut app) = setup();
        let day = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        app.refresh_window(day.and_time(NaiveTime::from_hms_opt(13, 0, 0).unwrap()));
        assert_eq!(app.window.current.unwrap().key, PrayerKey::Dhuhr);
        assert_eq!(app.window.next.unwrap().key, PrayerKey::Asr);

        app.refresh_window(day.and_time(NaiveTime::from_hms_opt(22, 0, 0).unwrap()));
        assert_eq!(app.window.next.unwrap().key, PrayerKey::Fajr);
    }

    #[test]
    fn language_key_cycles() {
        let (conn, mut app) = setup();
        assert_eq!(app.lang(), "en");
        app.handle_key(press(KeyCode::Char('l')), &conn);
        assert_eq!(app.lang(), "fr");
    }

    #[test]
    fn tick_on_new_day_reloads_today() {
        let (conn, mut app) = setup();
        let next_day = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        app.tick(&conn, next_day.and_time(NaiveTime::from_hms_opt(0, 0, 1).unwrap()));
        assert_eq!(app.today.gregorian, next_day);
        assert_eq!(app.today.hijri.unwrap().day, 11);
        assert_eq!(app.month.grid.selected().unwrap().day_number, 11);
        assert!(app.window.current.is_none());
        assert_eq!(app.window.next.unwrap().key, PrayerKey::Fajr);
    }

    #[test]
    fn escape_quits() {
        let (conn, mut app) = setup();
        app.handle_key(press(KeyCode::Esc), &conn);
        assert!(app.should_quit);
    }
}
