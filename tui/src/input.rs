//! Input handling for Unveil TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::{self, JoinHandle},
    time::timeout,
};
use tracing::debug;

use unveil_engine::InputEvent;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 64; // bounded: no OOM

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the async loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Wait for the next input event. Cancel-safe, so it can sit in `tokio::select!`.
    ///
    /// A reader failure or a dead reader thread is an error: the display must not keep
    /// animating without a way to dismiss it.
    pub async fn recv(&mut self) -> Result<InputEvent> {
        match self.rx.recv().await {
            Some(InputMsg::Event(ev)) => {
                let input = translate_event(&ev);
                debug!(?input, "input event");
                Ok(input)
            }
            Some(InputMsg::Error(msg)) => Err(anyhow!("input error: {msg}")),
            None => Err(anyhow!("input pump disconnected")),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a reader blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Map a terminal event to the scheduler's input vocabulary.
///
/// Enter and Space acknowledge; Esc, `q` and Ctrl+C cancel. Only key presses count, so a
/// held Enter cannot both start and dismiss a reveal.
#[must_use]
pub fn translate_event(ev: &Event) -> InputEvent {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Cancel,
            KeyCode::Esc | KeyCode::Char('q') => InputEvent::Cancel,
            KeyCode::Enter | KeyCode::Char(' ') => InputEvent::Acknowledge,
            _ => InputEvent::Other,
        },
        Event::Resize(..) => InputEvent::Resize,
        _ => InputEvent::Other,
    }
}
