use scheduler::{
    error::Result,
    logging::init_logging,
    result_merger::concat_results,
    task_splitter::{SplitStrategy, TaskSplitter},
    ShardingTask, ThreadPool,
};
use std::sync::Arc;

/// 把一批文本按批次分片，并行统计每行的单词数
struct LineWordCount {
    lines: Vec<String>,
    splitter: TaskSplitter,
}

impl ShardingTask for LineWordCount {
    type Param = Vec<String>;
    type Output = Vec<usize>;
    type Merged = Vec<usize>;

    fn split(&self) -> anyhow::Result<Vec<Vec<String>>> {
        Ok(self.splitter.split(self.lines.clone())?)
    }

    fn execute_one(&self, batch: Vec<String>) -> anyhow::Result<Option<Vec<usize>>> {
        Ok(Some(batch.iter().map(|line| line.split_whitespace().count()).collect()))
    }

    fn merge(&self, results: Vec<Vec<usize>>) -> anyhow::Result<Vec<usize>> {
        concat_results(results)
    }
}

fn main() -> Result<()> {
    init_logging("debug");

    // ---- 1. 准备输入 ----
    let lines = [
        "scatter the work",
        "gather the results",
        "merge them once",
        "in split order",
        "even when some fail",
    ];
    let task = Arc::new(LineWordCount {
        lines: lines.iter().map(|l| l.to_string()).collect(),
        splitter: TaskSplitter::new(SplitStrategy::ByBatch { batch_size: 2 })?,
    });

    // ---- 2. 执行 ----
    let pool = ThreadPool::new(2)?;
    let (counts, report) = task.execute_with_report(&pool)?;

    // ---- 3. 打印结果 ----
    println!("共 {} 个分片", report.submitted);
    for (line, count) in lines.iter().zip(&counts) {
        println!("  {:<24} {}", line, count);
    }

    Ok(())
}
