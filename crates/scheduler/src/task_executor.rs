// task_executor.rs
// 分片任务执行器：分片 -> 并行执行每个子任务 -> 合并结果。
// 单个子任务失败只记录日志并丢弃其结果，不影响整批任务；分片和合并失败直接返回给调用方。
use crate::error::{Error, Result};
use crate::pool::WorkerPool;
use crate::task::TaskHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 一次执行的汇总统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherReport {
    /// 提交的子任务数，等于分片数
    pub submitted: usize,
    /// 成功并产生结果的子任务数
    pub succeeded: usize,
    /// 执行失败或等待失败的子任务数
    pub failed: usize,
    /// 成功但没有返回值（None）的子任务数
    pub empty: usize,
}

impl GatherReport {
    /// 被丢弃的子任务数（失败 + 无返回值）
    pub fn dropped(&self) -> usize {
        self.failed + self.empty
    }
}

/// 执行入口，返回合并后的最终结果
///
/// 执行顺序：`split` -> 在 `pool` 上并行执行 `execute_one` -> `merge`。
/// 详见 [`execute_with_report`]。
pub fn execute<TP, TR, R, S, E, M, P>(split: S, execute_one: E, merge: M, pool: &P) -> Result<R>
where
    TP: Send + 'static,
    TR: Send + 'static,
    S: FnOnce() -> anyhow::Result<Vec<TP>>,
    E: Fn(TP) -> anyhow::Result<Option<TR>> + Send + Sync + 'static,
    M: FnOnce(Vec<TR>) -> anyhow::Result<R>,
    P: WorkerPool,
{
    execute_with_report(split, execute_one, merge, pool).map(|(merged, _)| merged)
}

/// 执行入口，同时返回本次执行的汇总统计
///
/// - `split` 在调用线程上执行一次，失败时直接返回 [`Error::Split`]，不会提交任何子任务；
/// - 每个分片提交一个子任务，提交不等待完成；
/// - 按提交顺序逐个等待子任务结果。失败（错误、panic、等待失败）只记录日志，
///   返回 `None` 的子任务同样不贡献结果，其余子任务照常汇总；
/// - 所有子任务到达终态后调用一次 `merge`（可能是空列表），失败时返回 [`Error::Merge`]。
pub fn execute_with_report<TP, TR, R, S, E, M, P>(
    split: S,
    execute_one: E,
    merge: M,
    pool: &P,
) -> Result<(R, GatherReport)>
where
    TP: Send + 'static,
    TR: Send + 'static,
    S: FnOnce() -> anyhow::Result<Vec<TP>>,
    E: Fn(TP) -> anyhow::Result<Option<TR>> + Send + Sync + 'static,
    M: FnOnce(Vec<TR>) -> anyhow::Result<R>,
    P: WorkerPool,
{
    let batch_id = Uuid::new_v4();
    let span = tracing::debug_span!("sharding", %batch_id);
    let _enter = span.enter();

    // 先分片出每个子任务的参数
    let task_params = split().map_err(Error::Split)?;
    tracing::debug!(shards = task_params.len(), "分片完成");

    let handles = scatter(task_params, execute_one, pool);
    let (results, report) = gather(handles);

    tracing::debug!(
        submitted = report.submitted,
        succeeded = report.succeeded,
        failed = report.failed,
        empty = report.empty,
        "子任务全部结束，开始合并"
    );
    let merged = merge(results).map_err(Error::Merge)?;
    Ok((merged, report))
}

/// 按分片顺序逐个提交子任务
fn scatter<TP, TR, E, P>(task_params: Vec<TP>, execute_one: E, pool: &P) -> Vec<TaskHandle<Option<TR>>>
where
    TP: Send + 'static,
    TR: Send + 'static,
    E: Fn(TP) -> anyhow::Result<Option<TR>> + Send + Sync + 'static,
    P: WorkerPool,
{
    let execute_one = Arc::new(execute_one);
    task_params
        .into_iter()
        .map(|param| {
            let execute_one = Arc::clone(&execute_one);
            pool.submit(move || execute_one(param))
        })
        .collect()
}

/// 按提交顺序等待每个子任务，只收集成功且有值的结果
fn gather<TR>(handles: Vec<TaskHandle<Option<TR>>>) -> (Vec<TR>, GatherReport) {
    let mut report = GatherReport {
        submitted: handles.len(),
        ..GatherReport::default()
    };
    let mut results = Vec::with_capacity(handles.len());

    for (index, handle) in handles.into_iter().enumerate() {
        let task_id = handle.task_id();
        match handle.join() {
            Ok(Some(result)) => {
                results.push(result);
                report.succeeded += 1;
            }
            Ok(None) => {
                tracing::debug!(index, %task_id, "子任务没有返回值，忽略");
                report.empty += 1;
            }
            Err(e) => {
                tracing::error!(index, %task_id, error = %e, "子任务执行失败，结果已丢弃");
                report.failed += 1;
            }
        }
    }

    (results, report)
}
