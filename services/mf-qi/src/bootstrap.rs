//! 服务启动与装配

use std::sync::Arc;

use ::config::ConfigError;
use telemetry::{MetricsRecorder, TelemetryError, init_tracing};
use thiserror::Error;
use tracing::info;

use crate::application::ServiceHandler;
use crate::config::QiServiceConfig;
use crate::infrastructure::events::{
    InMemoryEventBus, InspectionEventPublisher, NoOpEventPublisher,
};
use crate::infrastructure::locking::KeyedLockManager;
use crate::infrastructure::persistence::InMemoryInspectionStore;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// 服务运行时
pub struct ServiceRuntime {
    pub config: QiServiceConfig,
    /// 全局 Prometheus recorder，`render()` 输出抓取内容
    pub metrics: MetricsRecorder,
}

/// 加载 `.env`、配置，初始化 tracing 并安装 Prometheus recorder
///
/// 每个进程只能调用一次，重复调用返回 `BootstrapError::Telemetry`。
pub fn init(config_dir: &str) -> Result<ServiceRuntime, BootstrapError> {
    dotenvy::dotenv().ok();

    let config = QiServiceConfig::load(config_dir)?;
    init_tracing(&config.telemetry)?;
    let metrics = MetricsRecorder::install()?;

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );
    Ok(ServiceRuntime { config, metrics })
}

/// 内存装配的服务组件
pub struct InMemoryModule {
    pub handler: Arc<ServiceHandler>,
    pub store: Arc<InMemoryInspectionStore>,
    pub events: Arc<InMemoryEventBus>,
}

/// 以内存仓储、进程内锁和内存事件总线装配处理器
///
/// `publish_events = false` 时处理器改用 NoOp 发布器，`events` 保持为空。
pub fn build_in_memory(config: &QiServiceConfig) -> InMemoryModule {
    let store = Arc::new(InMemoryInspectionStore::new());
    let events = Arc::new(InMemoryEventBus::new());
    let publisher: Arc<dyn InspectionEventPublisher> = if config.lifecycle.publish_events {
        events.clone()
    } else {
        Arc::new(NoOpEventPublisher)
    };

    let handler = ServiceHandler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(KeyedLockManager::new()),
        publisher,
        config.lifecycle.clone(),
    );

    InMemoryModule {
        handler: Arc::new(handler),
        store,
        events,
    }
}
