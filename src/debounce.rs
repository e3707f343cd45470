use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Single-slot timer: only the most recently scheduled action can run, and
/// only once the delay elapses without another `schedule` call.
///
/// Must be used from within a tokio runtime.
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

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer for `action`, aborting a timer that has not fired yet.
    ///
    /// Once the timer fires the action is spawned as its own task, so later
    /// calls to `schedule` or `cancel` never interrupt an action that already
    /// started.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });
        if let Some(previous) = self.slot().replace(timer) {
            previous.abort();
        }
    }

    /// Drops the pending action, if any. Returns whether a timer was still armed.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(timer) => {
                let armed = !timer.is_finished();
                timer.abort();
                armed
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, value: &'static str) -> impl Future<Output = ()> {
        let log = Arc::clone(log);
        async move { log.lock().unwrap().push(value) }
    }

    #[tokio::test(start_paused = true)]
    async fn only_latest_action_runs() {
        let log = recorder();
        let debouncer = Debouncer::default();

        debouncer.schedule(push(&log, "b"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(push(&log, "ba"));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(log.lock().unwrap().is_empty());
        debouncer.schedule(push(&log, "bat"));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*log.lock().unwrap(), vec!["bat"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_invocation() {
        let log = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(push(&log, "x"));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timer() {
        let log = recorder();
        {
            let debouncer = Debouncer::default();
            debouncer.schedule(push(&log, "x"));
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fired_action_survives_cancel() {
        let log = recorder();
        let debouncer = Debouncer::default();
        let slow_log = Arc::clone(&log);
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            slow_log.lock().unwrap().push("slow");
        });

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*log.lock().unwrap(), vec!["slow"]);
    }
}
