// main.rs
// 分片调度器演示程序：并行计算 1..=upto 的平方和，可指定让部分子任务失败。
use anyhow::Result;
use clap::Parser;
use scheduler::{
    logging::init_logging,
    task_executor::execute_with_report,
    GatherReport,
    SchedulerConfig,
    WorkerPool,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sharding-scheduler", about = "并行计算平方和的分片调度演示")]
pub struct App {
    /// 计算 1..=upto 的平方和
    #[arg(short, long, default_value_t = 10)]
    pub upto: u64,

    /// 故意失败的子任务参数，可重复指定
    #[arg(short, long = "fail-on")]
    pub fail_on: Vec<u64>,

    /// 工作线程数，0 表示每个子任务一个线程；覆盖配置文件中的值
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// JSON配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = App::parse();

    let mut config = match &args.config {
        Some(path) => SchedulerConfig::from_json_file(path)?,
        None => SchedulerConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.max_concurrent_tasks = workers;
    }
    init_logging(&config.log_filter);
    tracing::info!(?config, "调度器配置");

    let pool = config.build_pool()?;
    let (total, report) = sum_of_squares(args.upto, args.fail_on, &pool)?;

    println!("平方和: {}", total);
    println!(
        "提交: {}  成功: {}  失败: {}  无结果: {}",
        report.submitted, report.succeeded, report.failed, report.empty
    );

    Ok(ExitCode::SUCCESS)
}

/// 并行计算 1..=upto 的平方和，溢出时返回错误而不是panic
fn sum_of_squares<P: WorkerPool>(
    upto: u64,
    fail_on: Vec<u64>,
    pool: &P,
) -> scheduler::Result<(u64, GatherReport)> {
    execute_with_report(
        move || Ok((1..=upto).collect::<Vec<u64>>()),
        move |x| {
            if fail_on.contains(&x) {
                anyhow::bail!("子任务 {} 被要求失败", x);
            }
            square(x).map(Some)
        },
        checked_sum,
        pool,
    )
}

fn square(x: u64) -> anyhow::Result<u64> {
    match x.checked_mul(x) {
        Some(squared) => Ok(squared),
        None => anyhow::bail!("{} 的平方超出 u64 范围", x),
    }
}

fn checked_sum(results: Vec<u64>) -> anyhow::Result<u64> {
    let mut total: u64 = 0;
    for value in results {
        total = match total.checked_add(value) {
            Some(sum) => sum,
            None => anyhow::bail!("平方和超出 u64 范围"),
        };
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler::{Error, ThreadPool};

    #[test]
    fn test_sum_of_squares_with_failures() {
        let pool = ThreadPool::new(2).unwrap();
        let (total, report) = sum_of_squares(5, vec![3], &pool).unwrap();

        assert_eq!(total, 46);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_square_overflow_is_item_failure() {
        assert!(square(u64::MAX).is_err());

        let pool = ThreadPool::new(1).unwrap();
        let (total, report) = execute_with_report(
            || Ok(vec![2u64, u64::MAX]),
            |x| square(x).map(Some),
            checked_sum,
            &pool,
        )
        .unwrap();

        assert_eq!(total, 4);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_sum_overflow_is_merge_error() {
        assert_eq!(checked_sum(vec![1, 2, 3]).unwrap(), 6);
        assert!(checked_sum(vec![u64::MAX, 1]).is_err());

        // 每个平方都在范围内，但总和超出 u64
        let pool = ThreadPool::new(2).unwrap();
        let near_limit = u64::from(u32::MAX);
        let outcome = execute_with_report(
            || Ok(vec![near_limit, near_limit]),
            |x| square(x).map(Some),
            checked_sum,
            &pool,
        );
        assert!(matches!(outcome, Err(Error::Merge(_))));
    }
}
