// task.rs
// 子任务的状态、ID以及提交后返回的任务句柄（TaskHandle）与完成端（TaskCompleter）。
use crate::error::{Error, Result};
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// 子任务唯一ID
pub type TaskId = Uuid;

/// 任务状态枚举，描述子任务的生命周期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// 等待执行
    Pending,
    /// 正在执行
    Running,
    /// 已完成
    Completed,
    /// 执行失败，包含失败原因
    Failed(String),
}

impl TaskStatus {
    /// 是否已到达终态（完成或失败）
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed(_))
    }
}

type SharedStatus = Arc<Mutex<TaskStatus>>;

fn lock_status(status: &SharedStatus) -> MutexGuard<'_, TaskStatus> {
    // 状态只是简单的枚举值，锁中毒时直接沿用内部值
    status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 创建一对相互关联的完成端与句柄
///
/// 线程池实现拿着 [`TaskCompleter`] 在工作线程上执行任务，
/// 调用方拿着 [`TaskHandle`] 等待结果。
pub fn task_pair<T>() -> (TaskCompleter<T>, TaskHandle<T>) {
    let task_id = TaskId::new_v4();
    let status = Arc::new(Mutex::new(TaskStatus::Pending));
    let (sender, receiver) = channel::bounded(1);

    let completer = TaskCompleter {
        task_id,
        status: Arc::clone(&status),
        sender,
    };
    let handle = TaskHandle {
        task_id,
        status,
        receiver,
    };
    (completer, handle)
}

/// 任务完成端，在工作线程上运行任务体并回传结果
pub struct TaskCompleter<T> {
    task_id: TaskId,
    status: SharedStatus,
    sender: Sender<Result<T>>,
}

impl<T> TaskCompleter<T> {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// 执行任务体，捕获错误与panic，并把结果发送给句柄
    pub fn run<F>(self, job: F)
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        *lock_status(&self.status) = TaskStatus::Running;

        let outcome = match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::TaskFailed(e)),
            Err(payload) => Err(Error::TaskPanicked(panic_message(payload.as_ref()))),
        };
        self.complete(outcome);
    }

    /// 直接以给定结果结束任务
    pub fn complete(self, outcome: Result<T>) {
        *lock_status(&self.status) = match &outcome {
            Ok(_) => TaskStatus::Completed,
            Err(e) => TaskStatus::Failed(e.to_string()),
        };
        // 句柄已被丢弃时没人关心结果
        if self.sender.send(outcome).is_err() {
            tracing::trace!(task_id = %self.task_id, "任务句柄已丢弃，结果被忽略");
        }
    }
}

/// 任务句柄，代表一个尚未得到结果的子任务
pub struct TaskHandle<T> {
    task_id: TaskId,
    status: SharedStatus,
    receiver: Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    /// 构造一个提交即失败的句柄（如线程池已关闭）
    pub fn rejected(error: Error) -> Self {
        let (completer, handle) = task_pair();
        completer.complete(Err(error));
        handle
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// 当前任务状态
    pub fn status(&self) -> TaskStatus {
        lock_status(&self.status).clone()
    }

    /// 阻塞等待任务结果
    ///
    /// 完成端在没有回传结果的情况下被丢弃时返回 [`Error::Disconnected`]。
    pub fn join(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => {
                let mut status = lock_status(&self.status);
                if !status.is_terminal() {
                    *status = TaskStatus::Failed(Error::Disconnected.to_string());
                }
                Err(Error::Disconnected)
            }
        }
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task_id", &self.task_id)
            .field("status", &self.status())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "未知panic".to_string()
    }
}
