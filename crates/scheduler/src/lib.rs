// lib.rs
// 调度器模块入口，声明并导出各子模块。
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod result_merger;
pub mod scheduler;
pub mod task;
pub mod task_executor;
pub mod task_splitter;

pub use config::SchedulerConfig;
pub use error::{Error, Result};
pub use pool::{AnyPool, SpawnPool, ThreadPool, WorkerPool};
pub use scheduler::ShardingTask;
pub use task::{TaskHandle, TaskId, TaskStatus};
pub use task_executor::{execute, execute_with_report, GatherReport};
