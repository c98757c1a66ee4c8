// config.rs
// 调度器全局配置结构体及其默认实现，包含最大并发任务数、线程名前缀和日志过滤规则。
use crate::error::{Error, Result};
use crate::pool::{AnyPool, SpawnPool, ThreadPool};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 调度器全局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 最大并发任务数（固定线程池的线程数），0 表示不限并发，每个子任务一个线程
    pub max_concurrent_tasks: usize,
    /// 工作线程名前缀
    pub thread_name_prefix: String,
    /// 默认日志过滤规则，RUST_LOG 优先
    pub log_filter: String,
}

impl Default for SchedulerConfig {
    /// 默认配置：最大4个并发任务
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 4,
            thread_name_prefix: "shard-worker".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// 从JSON配置文件读取，缺省字段使用默认值
    ///
    /// 文件不存在或读取失败返回 [`Error::ConfigError`]，内容不是合法JSON返回 [`Error::Json`]。
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                Error::ConfigError(format!("未找到配置文件 {}", path.display()))
            }
            _ => Error::ConfigError(format!("读取 {} 失败: {}", path.display(), e)),
        })?;
        let config: SchedulerConfig = serde_json::from_str(&contents)?;

        tracing::debug!(path = %path.display(), ?config, "配置已加载");
        Ok(config)
    }

    /// 按配置创建线程池
    pub fn build_pool(&self) -> Result<AnyPool> {
        if self.max_concurrent_tasks == 0 {
            Ok(AnyPool::Spawn(SpawnPool::with_name_prefix(&self.thread_name_prefix)))
        } else {
            let pool = ThreadPool::with_name_prefix(self.max_concurrent_tasks, &self.thread_name_prefix)?;
            Ok(AnyPool::Fixed(pool))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_concurrent_tasks, 4);
        assert_eq!(config.thread_name_prefix, "shard-worker");
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_concurrent_tasks": 8 }}"#).unwrap();

        let config = SchedulerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_concurrent_tasks, 8);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_missing_and_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SchedulerConfig::from_json_file(dir.path().join("config.json"));
        match missing {
            Err(Error::ConfigError(msg)) => assert!(msg.starts_with("未找到配置文件")),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let malformed = SchedulerConfig::from_json_file(file.path());
        assert!(matches!(malformed, Err(Error::Json(_))));
    }

    #[test]
    fn test_build_pool() {
        let fixed = SchedulerConfig::default().build_pool().unwrap();
        assert!(matches!(fixed, AnyPool::Fixed(ref pool) if pool.size() == 4));

        let unbounded = SchedulerConfig {
            max_concurrent_tasks: 0,
            ..SchedulerConfig::default()
        }
        .build_pool()
        .unwrap();
        assert!(matches!(unbounded, AnyPool::Spawn(_)));
    }
}
