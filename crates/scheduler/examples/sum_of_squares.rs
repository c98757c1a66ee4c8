use scheduler::{
    error::Result,
    logging::init_logging,
    result_merger::sum_results,
    task_executor::execute_with_report,
    SchedulerConfig,
};

/// 并行计算 1..=5 的平方和，其中 3 号子任务故意失败
fn main() -> Result<()> {
    // ---- 1. 初始化日志与线程池 ----
    let config = SchedulerConfig::default();
    init_logging(&config.log_filter);
    let pool = config.build_pool()?;
    println!("线程池已创建，最大并发任务数: {}", config.max_concurrent_tasks);

    // ---- 2. 分片 -> 并行执行 -> 合并 ----
    let (total, report) = execute_with_report(
        || Ok(vec![1u64, 2, 3, 4, 5]),
        |x| {
            if x == 3 {
                anyhow::bail!("子任务 {} 模拟失败", x);
            }
            Ok(Some(x * x))
        },
        sum_results,
        &pool,
    )?;

    // ---- 3. 打印结果 ----
    println!("\n平方和: {}", total);
    println!("提交 {} 个，成功 {} 个，失败 {} 个", report.submitted, report.succeeded, report.failed);
    assert_eq!(total, 46);

    Ok(())
}
