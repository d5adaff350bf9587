//! cuba-config - 配置加载库
//!
//! 加载顺序（后者覆盖前者）：
//! 1. `<dir>/default.toml`
//! 2. `<dir>/<APP_ENV>.toml`
//! 3. 以调用方给定前缀开头的环境变量，`__` 表示嵌套，
//!    如前缀 `QI_` 对应 `QI_TELEMETRY__LOG_LEVEL`

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 是否输出 JSON 日志（生产环境）
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

/// 当前运行环境，来自 `APP_ENV`
pub fn current_env() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env())
}

/// 构建分层配置源，`env_prefix` 由各服务自行指定
pub fn figment(config_dir: &str, env_prefix: &str) -> Figment {
    Figment::new()
        .merge(Toml::file(format!("{}/default.toml", config_dir)))
        .merge(Toml::file(format!("{}/{}.toml", config_dir, current_env())))
        .merge(Env::prefixed(env_prefix).split("__"))
}

/// 从分层配置源提取任意服务配置
pub fn load<T: DeserializeOwned>(config_dir: &str, env_prefix: &str) -> Result<T, ConfigError> {
    Ok(figment(config_dir, env_prefix).extract()?)
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        load(config_dir, env_prefix)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
