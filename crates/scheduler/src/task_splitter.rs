// task_splitter.rs
// 任务拆分辅助：按批次大小或分片数量把一个输入列表切成有序的多个分片，供分片函数直接使用。
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 拆分策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// 不拆分：整个输入作为一个分片
    Whole,
    /// 按批次拆分：每个分片最多 `batch_size` 个元素，最后一个分片可能不足
    ByBatch { batch_size: usize },
    /// 按分片数拆分：尽量均匀地分成 `shards` 份，靠前的分片多分到余数
    ByShards { shards: usize },
}

/// 任务拆分器
#[derive(Debug, Clone)]
pub struct TaskSplitter {
    pub strategy: SplitStrategy,
}

impl TaskSplitter {
    /// 创建拆分器，非法的策略参数直接返回错误
    pub fn new(strategy: SplitStrategy) -> Result<Self> {
        validate_strategy(&strategy)?;
        Ok(Self { strategy })
    }

    pub fn split<T>(&self, items: Vec<T>) -> Result<Vec<Vec<T>>> {
        split_items(items, &self.strategy)
    }
}

fn validate_strategy(strategy: &SplitStrategy) -> Result<()> {
    match strategy {
        SplitStrategy::ByBatch { batch_size: 0 } => {
            Err(Error::ConfigError("批次大小必须大于0".to_string()))
        }
        SplitStrategy::ByShards { shards: 0 } => {
            Err(Error::ConfigError("分片数必须大于0".to_string()))
        }
        _ => Ok(()),
    }
}

/// 按策略拆分输入列表，保持元素原有顺序；空输入不产生分片
pub fn split_items<T>(items: Vec<T>, strategy: &SplitStrategy) -> Result<Vec<Vec<T>>> {
    validate_strategy(strategy)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let shards = match strategy {
        SplitStrategy::Whole => vec![items],
        SplitStrategy::ByBatch { batch_size } => split_by_batch(items, *batch_size),
        SplitStrategy::ByShards { shards } => split_by_shards(items, *shards),
    };
    tracing::trace!(?strategy, shards = shards.len(), "输入拆分完成");
    Ok(shards)
}

fn split_by_batch<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
    let num_batches = items.len().div_ceil(batch_size);
    let mut batches = Vec::with_capacity(num_batches);
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(batch_size).collect());
    }
    batches
}

fn split_by_shards<T>(items: Vec<T>, shards: usize) -> Vec<Vec<T>> {
    // 分片数超过元素数时不产生空分片
    let shards = shards.min(items.len());
    let base = items.len() / shards;
    let remainder = items.len() % shards;

    let mut iter = items.into_iter();
    (0..shards)
        .map(|shard_id| {
            let size = if shard_id < remainder { base + 1 } else { base };
            iter.by_ref().take(size).collect()
        })
        .collect()
}
