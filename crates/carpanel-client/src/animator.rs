//! Speed readout animation
//!
//! While a motion command is in flight the readout is ramped locally so the
//! needle moves smoothly. The ramped value is a shadow of the authoritative
//! speed and is resynced by every status poll.

use carpanel_core::{Ramp, DEFAULT_RAMP_STEP};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::surface::Surface;

/// Default tick period of the ramp
pub const DEFAULT_TICK: Duration = Duration::from_millis(5);

struct RunningRamp {
    ramp: Ramp,
    handle: JoinHandle<()>,
}

/// Owns the ramp task; at most one ramp runs at a time
pub struct SpeedAnimator {
    shadow: Arc<AtomicU8>,
    surface: Arc<dyn Surface>,
    tick: Duration,
    step: u8,
    running: Mutex<Option<RunningRamp>>,
}

impl SpeedAnimator {
    pub fn new(surface: Arc<dyn Surface>, tick: Duration, step: u8) -> Self {
        Self {
            shadow: Arc::new(AtomicU8::new(0)),
            surface,
            tick,
            step: if step == 0 { DEFAULT_RAMP_STEP } else { step },
            running: Mutex::new(None),
        }
    }

    fn running(&self) -> MutexGuard<'_, Option<RunningRamp>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start ramping in `ramp` direction, replacing any ramp already running
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, ramp: Ramp) {
        let mut running = self.running();
        if let Some(previous) = running.take() {
            previous.handle.abort();
        }

        let shadow = self.shadow.clone();
        let surface = self.surface.clone();
        let tick = self.tick;
        let step = self.step;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let next = advance(&shadow, ramp, step);
                surface.show_speed(next);
            }
        });

        debug!(?ramp, from = self.current(), "Speed ramp started");
        *running = Some(RunningRamp { ramp, handle });
    }

    /// Cancel the running ramp; returns whether one was running
    pub fn stop(&self) -> bool {
        match self.running().take() {
            Some(previous) => {
                previous.handle.abort();
                debug!(ramp = ?previous.ramp, at = self.current(), "Speed ramp stopped");
                true
            }
            None => false,
        }
    }

    /// Direction of the running ramp, if any
    pub fn ramp(&self) -> Option<Ramp> {
        self.running()
            .as_ref()
            .filter(|r| !r.handle.is_finished())
            .map(|r| r.ramp)
    }

    /// Current shadow speed
    pub fn current(&self) -> u8 {
        self.shadow.load(Ordering::SeqCst)
    }

    /// Resync the shadow speed to a known value
    pub fn set(&self, speed: u8) {
        self.shadow.store(speed, Ordering::SeqCst);
    }
}

impl Drop for SpeedAnimator {
    fn drop(&mut self) {
        if let Some(running) = self.running().take() {
            running.handle.abort();
        }
    }
}

fn advance(shadow: &AtomicU8, ramp: Ramp, step: u8) -> u8 {
    let previous = shadow
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(ramp.step(current, step))
        })
        .unwrap_or_else(|current| current);
    ramp.step(previous, step)
}
