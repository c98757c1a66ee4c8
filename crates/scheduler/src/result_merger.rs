// result_merger.rs
// 常用的结果合并函数，均可直接作为合并函数使用，且都能处理空列表。
use std::iter::Sum;

/// 将所有分片结果按顺序拼接在一起
pub fn concat_results<T>(results: Vec<Vec<T>>) -> anyhow::Result<Vec<T>> {
    Ok(results.into_iter().flatten().collect())
}

/// 对所有结果求和，空列表返回零值
pub fn sum_results<T: Sum<T>>(results: Vec<T>) -> anyhow::Result<T> {
    Ok(results.into_iter().sum())
}

/// 统计结果个数
pub fn count_results<T>(results: Vec<T>) -> anyhow::Result<usize> {
    Ok(results.len())
}
