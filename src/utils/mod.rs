pub mod debug_mutex;
pub mod helper_tasks;
pub mod task_manager;
