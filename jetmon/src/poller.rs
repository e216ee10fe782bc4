//! Periodic snapshot fetching.
//!
//! A [`Poller`] owns at most one repeating timer. Each tick spawns a fetch
//! against a [`SnapshotSource`] unless the previous fetch is still running,
//! and the outcome is delivered to the UI loop as a [`PollEvent`]. Changing
//! the interval cancels the current timer and arms a new one under the same
//! lock, so two timers never coexist. Fetches run in their own tasks and are
//! not cancelled when the timer is replaced.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::Snapshot;

pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_INTERVAL_SECS: u64 = 2;

/// A polling period in whole seconds, always within
/// `MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollInterval(u64);

impl PollInterval {
    pub fn from_secs(secs: u64) -> Result<Self, ConfigError> {
        if (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(ConfigError::IntervalOutOfRange(secs))
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let secs = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidInterval(s.to_string()))?;
        Self::from_secs(secs)
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_millis(self) -> u64 {
        self.0 * 1000
    }

    pub fn duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    /// Moves by `delta` seconds, saturating at the range edges.
    pub fn step(self, delta: i64) -> Self {
        let secs = (self.0 as i64)
            .saturating_add(delta)
            .clamp(MIN_INTERVAL_SECS as i64, MAX_INTERVAL_SECS as i64);
        Self(secs as u64)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL_SECS)
    }
}

#[derive(Debug)]
pub enum PollEvent {
    Snapshot(Box<Snapshot>),
    Failed(String),
}

pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> BoxFuture<'_, anyhow::Result<Snapshot>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Scheduled,
    Fetching,
}

struct Timer {
    handle: JoinHandle<()>,
    interval: PollInterval,
}

// Counts timer tasks that are still alive; decremented when the task's
// future is dropped, including after abort.
struct LiveTimer(Arc<AtomicUsize>);

impl LiveTimer {
    fn new(count: Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// Holds the single-flight gate for one fetch. Released on drop so a fetch
// task that panics or is cancelled cannot leave the gate closed.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag.clone()))
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if std::thread::panicking() {
            warn!("snapshot fetch panicked; releasing the fetch gate");
        }
        self.0.store(false, Ordering::Release);
    }
}

pub struct Poller<S: SnapshotSource> {
    source: Arc<S>,
    events: mpsc::Sender<PollEvent>,
    timer: Mutex<Option<Timer>>,
    in_flight: Arc<AtomicBool>,
    live_timers: Arc<AtomicUsize>,
}

impl<S: SnapshotSource> Poller<S> {
    pub fn new(source: Arc<S>, events: mpsc::Sender<PollEvent>) -> Self {
        Self {
            source,
            events,
            timer: Mutex::new(None),
            in_flight: Arc::new(AtomicBool::new(false)),
            live_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Arms the timer. The first fetch happens immediately.
    pub fn start(&self, interval: PollInterval) {
        self.arm(interval);
    }

    /// Replaces the running timer with one at `interval`.
    pub fn reconfigure(&self, interval: PollInterval) {
        debug!(secs = interval.secs(), "reconfiguring poll interval");
        self.arm(interval);
    }

    pub fn stop(&self) {
        if let Some(t) = self.lock_timer().take() {
            t.handle.abort();
        }
    }

    pub fn interval(&self) -> Option<PollInterval> {
        self.lock_timer().as_ref().map(|t| t.interval)
    }

    pub fn state(&self) -> PollState {
        if self.lock_timer().is_none() {
            PollState::Idle
        } else if self.in_flight.load(Ordering::Acquire) {
            PollState::Fetching
        } else {
            PollState::Scheduled
        }
    }

    /// Timer tasks not yet torn down. Briefly exceeds one after a
    /// reconfigure until the runtime drops the aborted task.
    pub fn live_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<Timer>> {
        // The guarded value is a plain handle; a panic elsewhere cannot leave
        // it half-updated.
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn arm(&self, interval: PollInterval) {
        let mut slot = self.lock_timer();
        if let Some(old) = slot.take() {
            old.handle.abort();
        }
        let handle = self.spawn_timer(interval);
        *slot = Some(Timer { handle, interval });
    }

    fn spawn_timer(&self, interval: PollInterval) -> JoinHandle<()> {
        let guard = LiveTimer::new(self.live_timers.clone());
        let source = self.source.clone();
        let events = self.events.clone();
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = tokio::time::interval(interval.duration());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(gate) = InFlight::acquire(&in_flight) else {
                    debug!("previous fetch still running; skipping tick");
                    continue;
                };
                tokio::spawn(fetch_once(source.clone(), events.clone(), gate));
            }
        })
    }
}

impl<S: SnapshotSource> Drop for Poller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fetch_once<S: SnapshotSource>(
    source: Arc<S>,
    events: mpsc::Sender<PollEvent>,
    gate: InFlight,
) {
    let ev = match source.fetch().await {
        Ok(s) => PollEvent::Snapshot(Box::new(s)),
        Err(e) => {
            warn!("snapshot fetch failed: {e:#}");
            PollEvent::Failed(format!("{e:#}"))
        }
    };
    // Deliver before releasing the gate so results arrive in fetch order.
    let _ = events.send(ev).await;
    drop(gate);
}
