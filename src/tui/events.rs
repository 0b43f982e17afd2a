use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, Event as CEvent, KeyEvent};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal size changed; only a redraw is needed.
    Resize,
    /// Wall-clock reading taken when the tick fired.
    Tick(NaiveDateTime),
}

/// Terminal input and a clock tick multiplexed onto one channel.
///
/// The polling thread exits once a send fails, which happens as soon as the
/// handler (and with it the receiver) is dropped.
pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);
        thread::spawn(move || poll_loop(tx, tick_rate));
        Self { rx }
    }

    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}

fn poll_loop(tx: Sender<Event>, tick_rate: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout).unwrap_or(false) {
            let forwarded = match event::read() {
                Ok(CEvent::Key(key)) => Some(Event::Key(key)),
                Ok(CEvent::Resize(..)) => Some(Event::Resize),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Terminal event read failed: {}", e);
                    break;
                }
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if tx.send(Event::Tick(Local::now().naive_local())).is_err() {
                break;
            }
            last_tick = Instant::now();
        }
    }
    log::debug!("Event thread stopped");
}
