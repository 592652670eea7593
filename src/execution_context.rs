use std::future::Future;

use tokio_util::task::TaskTracker;

/// Tracks background work an invocation has handed off after responding.
///
/// Work registered through [`ExecutionContext::wait_until`] always runs to
/// completion; [`ExecutionContext::finish`] resolves once every registered
/// task, including tasks registered by other tasks, is done.
#[derive(Clone)]
pub struct ExecutionContext {
    tasks: TaskTracker,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            tasks: TaskTracker::new(),
        }
    }

    pub fn wait_until<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(work);
    }

    pub async fn finish(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
