use scheduler::{
    result_merger::{count_results, sum_results},
    task_executor::{execute, execute_with_report},
    Error, GatherReport, SchedulerConfig, SpawnPool, ThreadPool,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_one_failing_item_is_dropped() {
    let pool = ThreadPool::new(3).unwrap();
    let merged_input = Mutex::new(Vec::new());

    let total = execute(
        || Ok(vec![1u64, 2, 3, 4, 5]),
        |x| {
            if x == 3 {
                anyhow::bail!("three is not allowed");
            }
            Ok(Some(x * x))
        },
        |results: Vec<u64>| {
            merged_input.lock().unwrap().extend_from_slice(&results);
            sum_results(results)
        },
        &pool,
    )
    .unwrap();

    assert_eq!(total, 46);
    assert_eq!(*merged_input.lock().unwrap(), vec![1, 4, 16, 25]);
}

#[test]
fn test_empty_split_merges_empty_list() {
    let pool = SpawnPool::new();
    let merge_calls = AtomicUsize::new(0);

    let total = execute(
        || Ok(Vec::<u64>::new()),
        |x| Ok(Some(x)),
        |results: Vec<u64>| {
            merge_calls.fetch_add(1, Ordering::SeqCst);
            assert!(results.is_empty());
            sum_results(results)
        },
        &pool,
    )
    .unwrap();

    assert_eq!(total, 0);
    assert_eq!(merge_calls.load(Ordering::SeqCst), 1);
    assert_eq!(pool.spawned(), 0);
}

#[test]
fn test_every_item_failing_still_merges() {
    let pool = SchedulerConfig::default().build_pool().unwrap();

    let count = execute(
        || Ok(vec!["a", "b"]),
        |_: &str| -> anyhow::Result<Option<u8>> { anyhow::bail!("unavailable") },
        count_results,
        &pool,
    )
    .unwrap();

    assert_eq!(count, 0);
}

#[test]
fn test_k_failures_keep_relative_order() {
    let pool = ThreadPool::new(4).unwrap();
    let failing = [0usize, 7, 8, 19];

    let (results, report) = execute_with_report(
        || Ok((0..20).collect::<Vec<usize>>()),
        move |x| {
            if failing.contains(&x) {
                anyhow::bail!("item {} failed", x);
            }
            Ok(Some(x))
        },
        |results: Vec<usize>| Ok(results),
        &pool,
    )
    .unwrap();

    let expected: Vec<usize> = (0..20).filter(|x| !failing.contains(x)).collect();
    assert_eq!(results, expected);
    assert_eq!(
        report,
        GatherReport {
            submitted: 20,
            succeeded: 16,
            failed: 4,
            empty: 0
        }
    );
}

#[test]
fn test_each_param_executed_exactly_once() {
    let pool = SpawnPool::new();
    let executions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&executions);
    let split_calls = AtomicUsize::new(0);

    let results = execute(
        || {
            split_calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..50).collect::<Vec<u32>>())
        },
        move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(x))
        },
        |results: Vec<u32>| Ok(results),
        &pool,
    )
    .unwrap();

    assert_eq!(results.len(), 50);
    assert_eq!(split_calls.load(Ordering::SeqCst), 1);
    assert_eq!(executions.load(Ordering::SeqCst), 50);
    assert_eq!(pool.spawned(), 50);
}

#[test]
fn test_merge_error_propagates() {
    let pool = ThreadPool::new(2).unwrap();
    let outcome = execute(
        || Ok(vec![1u32]),
        |x| Ok(Some(x)),
        |_: Vec<u32>| -> anyhow::Result<u32> { anyhow::bail!("cannot merge") },
        &pool,
    );

    assert!(matches!(outcome, Err(Error::Merge(_))));
}
