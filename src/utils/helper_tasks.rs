use crate::utils::task_manager::TaskManager;
use futures::Future;
use tokio::task::JoinError;

lazy_static! {
    /// a static multithreaded task manager used to run fetch providers and to drive loads to completion
    static ref HELPER_TASKS: TaskManager = TaskManager::new(std::cmp::max(2, num_cpus::get()));
}

/// run a blocking task in the "helper" thread pool
pub fn add_helper_task_blocking<R, T>(task: T) -> impl Future<Output = Result<R, JoinError>>
where
    R: Send + 'static,
    T: FnOnce() -> R + Send + 'static,
{
    log::trace!("adding a blocking helper task");
    HELPER_TASKS.add_task_blocking(task)
}

/// add an async task to the "helper" thread pool
pub fn add_helper_task_async<R: Send + 'static, T: Future<Output = R> + Send + 'static>(
    task: T,
) -> impl Future<Output = Result<R, JoinError>> {
    log::trace!("adding an async helper task");
    HELPER_TASKS.add_task_async(task)
}
