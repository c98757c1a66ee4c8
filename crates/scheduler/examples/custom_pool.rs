use scheduler::{
    error::Result,
    result_merger::count_results,
    task::{task_pair, TaskHandle},
    task_executor::execute,
    WorkerPool,
};

/// 在提交线程上立即执行任务的“线程池”，便于调试时得到确定的执行顺序
struct InlinePool;

impl WorkerPool for InlinePool {
    fn submit<T, F>(&self, job: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let (completer, handle) = task_pair();
        completer.run(job);
        handle
    }
}

fn main() -> Result<()> {
    // 两个子任务都失败，合并函数仍会以空列表被调用一次
    let count = execute(
        || Ok(vec!["a", "b"]),
        |name: &str| -> anyhow::Result<Option<String>> { anyhow::bail!("{} 不可用", name) },
        count_results,
        &InlinePool,
    )?;

    println!("成功的子任务数: {}", count);
    assert_eq!(count, 0);
    Ok(())
}
