use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    /// No input arrived within the current tick rate.
    Tick,
    Resize,
}

/// Polls the terminal on a background thread. The tick rate can be changed
/// while running so animations get a faster frame rate than idle screens.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tick_ms: Arc<AtomicU64>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_ms = Arc::new(AtomicU64::new(tick_rate.as_millis() as u64));
        let poll_ms = Arc::clone(&tick_ms);

        thread::spawn(move || {
            loop {
                let timeout = Duration::from_millis(poll_ms.load(Ordering::Relaxed));
                let sent = if event::poll(timeout).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => tx.send(AppEvent::Key(key)),
                        Ok(Event::Resize(..)) => tx.send(AppEvent::Resize),
                        _ => Ok(()),
                    }
                } else {
                    tx.send(AppEvent::Tick)
                };
                if sent.is_err() {
                    return;
                }
            }
        });

        Self { rx, tick_ms }
    }

    pub fn set_tick_rate(&self, tick_rate: Duration) {
        self.tick_ms
            .store(tick_rate.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
