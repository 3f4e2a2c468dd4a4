use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleOptions {
    /// Invoke on the first call of a window.
    pub leading: bool,
    /// Invoke once more at the end of a window with the latest arguments it saw.
    pub trailing: bool,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

/// Limits calls to `func` to at most one per `interval`.
///
/// Must be used from within a tokio runtime, the trailing edge runs on a spawned task.
pub struct Throttle<T> {
    inner: Arc<ThrottleInner<T>>,
}

struct ThrottleInner<T> {
    interval: Duration,
    options: ThrottleOptions,
    func: Box<dyn Fn(T) + Send + Sync>,
    state: Mutex<ThrottleState<T>>,
}

struct ThrottleState<T> {
    pending: Option<T>,
    timer: Option<JoinHandle<()>>,
    generation_id: u64,
}

impl<T> Clone for Throttle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> Throttle<T> {
    pub fn new<F>(interval: Duration, options: ThrottleOptions, func: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ThrottleInner {
                interval,
                options,
                func: Box::new(func),
                state: Mutex::new(ThrottleState {
                    pending: None,
                    timer: None,
                    generation_id: 0,
                }),
            }),
        }
    }

    pub fn call(&self, args: T) {
        let mut state = self.inner.state.lock();

        if state.timer.is_some() {
            state.pending = Some(args);
            return;
        }

        let generation_id = state.generation_id;
        state.timer = Some(tokio::spawn(Self::run_window(
            Arc::clone(&self.inner),
            generation_id,
        )));

        if self.inner.options.leading {
            drop(state);
            (self.inner.func)(args);
        } else {
            state.pending = Some(args);
        }
    }

    /// Drops any scheduled trailing invocation. The next call starts a fresh window.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        state.generation_id += 1;
        state.pending = None;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.inner.state.lock().timer.is_some()
    }

    async fn run_window(inner: Arc<ThrottleInner<T>>, generation_id: u64) {
        loop {
            tokio::time::sleep(inner.interval).await;

            let args = {
                let mut state = inner.state.lock();
                if state.generation_id != generation_id {
                    return;
                }

                match state.pending.take() {
                    Some(args) if inner.options.trailing => args,
                    _ => {
                        state.timer = None;
                        return;
                    }
                }
            };

            // A trailing invocation opens a new window.
            (inner.func)(args);
        }
    }
}
