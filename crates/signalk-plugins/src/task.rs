//! Cancellable repeating background job.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::plugin::PluginError;

/// Handle to a job that runs immediately and then once per period.
///
/// Each run is spawned as its own task, so a slow run never delays the next
/// tick and runs may overlap. Stopping cancels future runs only; runs already
/// in flight finish on their own.
#[derive(Debug, Default)]
pub struct PeriodicTask {
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the job, replacing any job this handle already runs.
    ///
    /// `period` must be non-zero. Fails when called outside a tokio runtime.
    pub fn start<F, Fut>(&mut self, period: Duration, mut job: F) -> Result<(), PluginError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PluginError::Runtime(e.to_string()))?;

        self.stop();
        self.handle = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately.
                interval.tick().await;
                tokio::spawn(job());
            }
        }));
        Ok(())
    }

    /// Cancel future runs. Returns false if nothing was running.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}
