use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};

/// Raw terminal event, straight off the backend.
#[derive(Clone, Copy, Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Resize,
}

/// What the battle loop consumes. The runner translates key codes and tick
/// timeouts into these, so the loop never touches crossterm types or
/// durations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// One character of battle input; Enter arrives as `'\n'`.
    Type(char),
    /// Restart the battle (tab).
    Restart,
    /// Leave the game (esc or ctrl-c).
    Quit,
    /// Advance the clock and animation by `dt_secs`.
    Advance { dt_secs: f64 },
    /// Terminal geometry changed; redraw only.
    Redraw,
}

/// Source of raw terminal events (keyboard, resize).
pub trait RawEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<RawEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<RawEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(RawEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(RawEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RawEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RawEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker; the interval is the fast animation cadence.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<RawEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<RawEvent>) -> Self {
        Self { rx }
    }
}

impl RawEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RawEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Key bindings for the battle. Keys with no meaning here are swallowed by
/// the runner. Control chords never type; only ctrl-c is bound.
fn map_key(key: KeyEvent) -> Option<GameEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(GameEvent::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(GameEvent::Quit),
        KeyCode::Tab => Some(GameEvent::Restart),
        KeyCode::Enter => Some(GameEvent::Type('\n')),
        KeyCode::Char(c) => Some(GameEvent::Type(c)),
        _ => None,
    }
}

/// Runner that turns raw terminal events into game events, one per step
pub struct Runner<E: RawEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: RawEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval for terminal input. A timeout becomes
    /// an `Advance` carrying the interval as seconds; unbound keys restart
    /// the wait.
    pub fn step(&self) -> GameEvent {
        loop {
            match self.event_source.recv_timeout(self.ticker.interval()) {
                Ok(RawEvent::Key(key)) => {
                    if let Some(ev) = map_key(key) {
                        return ev;
                    }
                }
                Ok(RawEvent::Resize) => return GameEvent::Redraw,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return GameEvent::Advance {
                        dt_secs: self.ticker.interval().as_secs_f64(),
                    }
                }
            }
        }
    }
}
