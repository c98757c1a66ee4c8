// pool.rs
// 工作线程池：定义“提交任务得到句柄”的能力（WorkerPool），并提供固定大小线程池与按需起线程的池。
use crate::error::{Error, Result};
use crate::task::{task_pair, TaskHandle};
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// 能并发执行子任务的线程池
///
/// 提交不会阻塞等待任务完成，返回的 [`TaskHandle`] 用于等待结果。
pub trait WorkerPool {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static;
}

impl<P: WorkerPool> WorkerPool for &P {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        (**self).submit(job)
    }
}

impl<P: WorkerPool> WorkerPool for Arc<P> {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        (**self).submit(job)
    }
}

/// 固定大小的线程池，工作线程共享一个无界任务队列
pub struct ThreadPool {
    /// 关闭后置为None，不再接收新任务
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl ThreadPool {
    /// 创建指定线程数的线程池
    pub fn new(size: usize) -> Result<Self> {
        Self::with_name_prefix(size, "shard-worker")
    }

    pub fn with_name_prefix(size: usize, prefix: &str) -> Result<Self> {
        if size == 0 {
            return Err(Error::ConfigError("线程池大小必须大于0".to_string()));
        }

        let (sender, receiver) = channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);
        for worker_id in 0..size {
            let worker = spawn_worker(format!("{}-{}", prefix, worker_id), receiver.clone())?;
            workers.push(worker);
        }
        tracing::debug!(size, prefix, "线程池已启动");

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_shutdown(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    /// 停止接收新任务，等待已排队的任务全部执行完后回收工作线程
    pub fn shutdown(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let workers = std::mem::take(
            &mut *self
                .workers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for worker in workers {
            let name = worker.thread().name().unwrap_or("<unnamed>").to_string();
            if worker.join().is_err() {
                tracing::error!(worker = %name, "工作线程异常退出");
            }
        }
        tracing::debug!(size = self.size, "线程池已关闭");
    }
}

fn spawn_worker(name: String, receiver: Receiver<Job>) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new().name(name).spawn(move || {
        // 队列关闭后仍会把剩余任务取完
        while let Ok(job) = receiver.recv() {
            job();
        }
    })?;
    Ok(handle)
}

impl WorkerPool for ThreadPool {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let guard = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(sender) = guard.as_ref() else {
            tracing::warn!("线程池已关闭，任务被拒绝");
            return TaskHandle::rejected(Error::PoolShutdown);
        };

        let (completer, handle) = task_pair();
        let task_id = completer.task_id();
        if sender.send(Box::new(move || completer.run(job))).is_err() {
            // 所有工作线程都已退出，丢弃的完成端会让句柄得到Disconnected
            tracing::error!(%task_id, "任务队列已断开");
        }
        handle
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("size", &self.size)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

/// 不限并发的池：每次提交都起一个新线程
#[derive(Debug)]
pub struct SpawnPool {
    thread_name_prefix: String,
    spawned: AtomicUsize,
}

impl SpawnPool {
    pub fn new() -> Self {
        Self::with_name_prefix("shard-worker")
    }

    pub fn with_name_prefix(prefix: &str) -> Self {
        Self {
            thread_name_prefix: prefix.to_string(),
            spawned: AtomicUsize::new(0),
        }
    }

    /// 累计起过的线程数
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl Default for SpawnPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool for SpawnPool {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let seq = self.spawned.fetch_add(1, Ordering::Relaxed);
        let (completer, handle) = task_pair();
        let spawned = thread::Builder::new()
            .name(format!("{}-{}", self.thread_name_prefix, seq))
            .spawn(move || completer.run(job));

        match spawned {
            Ok(_) => handle,
            Err(e) => {
                tracing::error!(error = %e, "创建工作线程失败");
                TaskHandle::rejected(Error::Io(e))
            }
        }
    }
}

/// 运行时按配置选择的线程池
#[derive(Debug)]
pub enum AnyPool {
    Fixed(ThreadPool),
    Spawn(SpawnPool),
}

impl WorkerPool for AnyPool {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        match self {
            AnyPool::Fixed(pool) => pool.submit(job),
            AnyPool::Spawn(pool) => pool.submit(job),
        }
    }
}
