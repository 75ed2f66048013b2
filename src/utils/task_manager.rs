use futures::Future;
use log::trace;
use tokio::runtime::Runtime;
use tokio::task::JoinError;

/// owns a multi threaded tokio runtime, the handles it returns may be awaited from any executor
pub struct TaskManager {
    runtime: Runtime,
}

impl TaskManager {
    pub fn new(thread_count: usize) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(thread_count)
            .max_blocking_threads(thread_count)
            .thread_name("module-loader-helper")
            .build()
            .expect("tokio rt failed");

        TaskManager { runtime }
    }

    /// run a blocking task in the blocking pool of the runtime
    pub fn add_task_blocking<R: Send + 'static, T: FnOnce() -> R + Send + 'static>(
        &self,
        task: T,
    ) -> impl Future<Output = Result<R, JoinError>> {
        trace!("adding a blocking task from thread {}", thread_id::get());
        self.runtime.spawn_blocking(task)
    }

    /// start an async task
    /// # Example
    /// ```rust
    /// use es_module_loader::utils::task_manager::TaskManager;
    /// let tm = TaskManager::new(2);
    /// let task = async { 6 * 7 };
    /// let res = futures::executor::block_on(tm.add_task_async(task));
    /// assert_eq!(res.ok(), Some(42));
    /// ```
    pub fn add_task_async<R: Send + 'static, T: Future<Output = R> + Send + 'static>(
        &self,
        task: T,
    ) -> impl Future<Output = Result<R, JoinError>> {
        self.runtime.spawn(task)
    }
}
