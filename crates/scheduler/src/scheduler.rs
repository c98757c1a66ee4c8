// scheduler.rs
// 分片任务调度器接口：实现分片、单任务执行、结果合并三个方法即可获得并行执行能力。
use crate::error::Result;
use crate::pool::WorkerPool;
use crate::task_executor::{self, GatherReport};
use std::sync::Arc;

/// 分片任务
///
/// 用于把一个大任务拆成多个互不依赖的子任务并行执行。`split` 没有参数，
/// 所以实现者自身应当携带拆分所需的上下文。
///
/// 三个方法可能在不同线程上同时被调用，实现者自己负责内部共享状态的同步。
pub trait ShardingTask: Send + Sync + 'static {
    /// 单个子任务的参数类型
    type Param: Send + 'static;
    /// 单个子任务的返回值类型
    type Output: Send + 'static;
    /// 最终结果类型
    type Merged;

    /// 执行分片，切分成子任务参数列表
    fn split(&self) -> anyhow::Result<Vec<Self::Param>>;

    /// 执行单个子任务，返回 `None` 表示该子任务没有贡献
    fn execute_one(&self, param: Self::Param) -> anyhow::Result<Option<Self::Output>>;

    /// 合并所有子任务的结果，需要能处理空列表
    fn merge(&self, results: Vec<Self::Output>) -> anyhow::Result<Self::Merged>;

    /// 执行入口：分片 -> 并行执行 -> 合并
    fn execute<P: WorkerPool>(self: Arc<Self>, pool: &P) -> Result<Self::Merged>
    where
        Self: Sized,
    {
        self.execute_with_report(pool).map(|(merged, _)| merged)
    }

    /// 与 [`ShardingTask::execute`] 相同，额外返回汇总统计
    fn execute_with_report<P: WorkerPool>(
        self: Arc<Self>,
        pool: &P,
    ) -> Result<(Self::Merged, GatherReport)>
    where
        Self: Sized,
    {
        let worker = Arc::clone(&self);
        task_executor::execute_with_report(
            || self.split(),
            move |param| worker.execute_one(param),
            |results| self.merge(results),
            pool,
        )
    }
}
