//! 服务配置

use std::time::Duration;

use ::config::{ConfigError, TelemetryConfig};
use serde::Deserialize;

/// 生命周期配置
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// 等待聚合锁的最长时间（毫秒）
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// 保存成功后是否发布领域事件
    #[serde(default = "default_publish_events")]
    pub publish_events: bool,
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

fn default_publish_events() -> bool {
    true
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            publish_events: default_publish_events(),
        }
    }
}

impl LifecycleConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// mf-qi 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct QiServiceConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

/// mf-qi 的环境变量前缀
pub const ENV_PREFIX: &str = "QI_";

impl QiServiceConfig {
    /// 从配置目录和 `QI_` 环境变量加载
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        ::config::load(config_dir, ENV_PREFIX)
    }
}
