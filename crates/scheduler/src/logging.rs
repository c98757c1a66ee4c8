// logging.rs
// 日志初始化：基于 tracing-subscriber，RUST_LOG 环境变量优先于传入的默认过滤规则。
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// 初始化全局日志，可重复调用，只有第一次生效
pub fn init_logging(default_filter: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_names(true))
            .try_init();

        // 全局subscriber已被其他地方设置时沿用已有的
        if result.is_err() {
            tracing::debug!("全局日志已初始化，沿用已有配置");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("debug");
        init_logging("trace");
        tracing::info!("logging initialized");
    }
}
