//! Debounce and throttle for callbacks fired from rapid input (search boxes,
//! scroll handlers, repeated button presses).
//!
//! Both spawn onto the current tokio runtime and must be used from inside one.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs the callback once calls stop arriving for `delay` (trailing edge).
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `f`, replacing whatever was scheduled before.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            f();
        });
        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Default)]
struct ThrottleState {
    last_run: Option<Instant>,
    trailing: Option<JoinHandle<()>>,
}

/// Runs the first call immediately, then at most once per `interval`. The
/// first call inside the window is deferred to the end of it; further calls
/// are dropped while that one is pending.
#[derive(Debug)]
pub struct Throttler {
    interval: Duration,
    state: Arc<Mutex<ThrottleState>>,
}

impl Throttler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Arc::new(Mutex::new(ThrottleState::default())),
        }
    }

    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let now = Instant::now();
        let mut state = self.state.lock();

        let elapsed = state.last_run.map(|last| now.saturating_duration_since(last));
        match elapsed {
            Some(elapsed) if elapsed < self.interval => {
                if state.trailing.is_some() {
                    return;
                }
                let deadline = now + (self.interval - elapsed);
                let shared = self.state.clone();
                state.trailing = Some(tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    {
                        let mut state = shared.lock();
                        state.last_run = Some(Instant::now());
                        state.trailing = None;
                    }
                    f();
                }));
            }
            _ => {
                if let Some(previous) = state.trailing.take() {
                    previous.abort();
                }
                state.last_run = Some(now);
                drop(state);
                f();
            }
        }
    }
}

impl Drop for Throttler {
    fn drop(&mut self) {
        if let Some(task) = self.state.lock().trailing.take() {
            task.abort();
        }
    }
}
