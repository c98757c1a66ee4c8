// error.rs
// 定义调度器通用的错误类型（分片、合并、子任务、线程池、配置等）和Result类型。
use thiserror::Error;

/// 调度器通用错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 分片阶段失败，整个调用直接失败
    #[error("分片错误: {0}")]
    Split(#[source] anyhow::Error),

    /// 合并阶段失败，整个调用直接失败
    #[error("合并错误: {0}")]
    Merge(#[source] anyhow::Error),

    /// 单个子任务返回了错误
    #[error("子任务执行错误: {0}")]
    TaskFailed(#[source] anyhow::Error),

    /// 单个子任务发生panic
    #[error("子任务panic: {0}")]
    TaskPanicked(String),

    /// 线程池已关闭，无法再接收任务
    #[error("线程池已关闭")]
    PoolShutdown,

    /// 等待结果时执行端已断开
    #[error("等待子任务结果失败: 执行端已断开")]
    Disconnected,

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON解析错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 通用结果类型
pub type Result<T> = std::result::Result<T, Error>;
