use std::future::Future;

use hashbrown::HashMap;
use tokio::task::JoinHandle;

/// Named background tasks. At most one live task is kept per name.
///
/// Cancellation is `JoinHandle::abort`, which takes effect the next time the
/// task reaches a suspension point.
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` under `name`, aborting whatever was registered there.
    pub fn start<F>(&mut self, name: impl Into<String>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        self.stop(&name);
        self.prune_finished();

        tracing::debug!(task = %name, "Starting background task");
        let handle = tokio::spawn(task);
        self.tasks.insert(name, handle);
    }

    /// Abort the task registered under `name`. Unknown names are ignored.
    pub fn stop(&mut self, name: &str) {
        if let Some(handle) = self.tasks.remove(name) {
            tracing::debug!(task = %name, "Stopping background task");
            handle.abort();
        }
    }

    pub fn stop_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// True while a task is registered under `name` and has not completed.
    pub fn is_running(&self, name: &str) -> bool {
        self.tasks
            .get(name)
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Number of registered tasks that have not completed yet
    pub fn running(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop handles of tasks that already ran to completion.
    fn prune_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        self.stop_all();
    }
}
