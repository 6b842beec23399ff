pub mod worker;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Tracks running background tasks so they can be cancelled on shutdown
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a background task.
    /// A running task with the same ID is cancelled first.
    pub fn spawn_task<F>(&mut self, task_id: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.tasks.remove(task_id) {
            handle.abort();
        }

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id.to_string(), handle);
    }

    pub fn is_running(&self, task_id: &str) -> bool {
        self.tasks
            .get(task_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_id_replaces_task() {
        let mut manager = BackgroundTaskManager::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let first = tx.clone();
        manager.spawn_task("oauth", async move {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            let _ = first.send("first");
        });
        manager.spawn_task("oauth", async move {
            let _ = tx.send("second");
        });

        assert_eq!(rx.recv().await, Some("second"));
        // The first task was aborted and dropped its sender
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let mut manager = BackgroundTaskManager::new();
        manager.spawn_task("flags", std::future::pending());
        assert!(manager.is_running("flags"));

        manager.cancel_all();
        assert!(!manager.is_running("flags"));
    }
}
