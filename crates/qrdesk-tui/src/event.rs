//! Terminal input plus the two clocks that drive the app.
//!
//! The frame clock always runs. The spinner clock only runs while the app
//! says something is animating (a QR generation in flight), so an idle
//! session does not wake the loop just to redraw a stopped spinner.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Spinner step; only emitted while animating.
    Tick,
    Render,
}

/// Clock periods for the reader.
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub frame: Duration,
    pub spinner: Duration,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(33),
            spinner: Duration::from_millis(120),
        }
    }
}

/// Background reader feeding [`Event`]s to the app loop.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    animating: watch::Sender<bool>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (animating, animating_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        tokio::spawn(pump(tx, animating_rx, cancel.clone(), rates));

        Self {
            rx,
            animating,
            cancel,
        }
    }

    /// Start or stop the spinner clock. Repeated calls with the same value
    /// do not wake the reader.
    pub fn set_animating(&self, on: bool) {
        self.animating.send_if_modified(|current| replace_flag(current, on));
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Store `on`, reporting whether it differs from what was there.
fn replace_flag(current: &mut bool, on: bool) -> bool {
    std::mem::replace(current, on) != on
}

fn clock(period: Duration) -> Interval {
    let mut clock = interval(period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    clock
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    mut animating: watch::Receiver<bool>,
    cancel: CancellationToken,
    rates: Rates,
) {
    let mut input = EventStream::new();
    let mut frames = clock(rates.frame);
    let mut spinner = clock(rates.spinner);

    loop {
        let spinning = *animating.borrow();
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            changed = animating.changed() => {
                if changed.is_err() {
                    break;
                }
                if *animating.borrow() {
                    spinner.reset();
                }
                continue;
            }

            _ = spinner.tick(), if spinning => Event::Tick,

            _ = frames.tick() => Event::Render,

            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal input error");
                    continue;
                }
                None => {
                    debug!("terminal input closed");
                    break;
                }
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Keep key presses and resizes; everything else is noise to this app.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
