//! 集成测试公共夹具

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use config::TelemetryConfig;
use errors::{AppError, AppResult};
use mf_qi::application::{CreateInspectionCommand, RecordDefectCommand, ServiceHandler};
use mf_qi::bootstrap::{InMemoryModule, build_in_memory};
use mf_qi::config::{LifecycleConfig, QiServiceConfig};
use mf_qi::domain::{
    DefectId, Inspection, InspectionDefect, InspectionDefectId, InspectionDefectRepository,
    InspectionId, InspectionRepository, InspectionType,
};
use mf_qi::infrastructure::events::InMemoryEventBus;
use mf_qi::infrastructure::persistence::InMemoryInspectionStore;
use ports::{AggregateLock, Repository};

pub fn test_config(publish_events: bool) -> QiServiceConfig {
    QiServiceConfig {
        app_name: "mf-qi-test".to_string(),
        app_env: "test".to_string(),
        telemetry: TelemetryConfig::default(),
        lifecycle: LifecycleConfig {
            lock_timeout_ms: 2000,
            publish_events,
        },
    }
}

pub fn module() -> InMemoryModule {
    build_in_memory(&test_config(true))
}

/// 创建 NEW 状态的检验单
pub async fn create_inspection(handler: &ServiceHandler, code: &str) -> InspectionId {
    handler
        .create_inspection(CreateInspectionCommand::new(code, InspectionType::Final))
        .await
        .unwrap()
}

pub async fn record_defect(
    handler: &ServiceHandler,
    inspection_id: InspectionId,
    quantity_affected: i32,
) -> InspectionDefectId {
    handler
        .record_defect(RecordDefectCommand {
            inspection_id,
            defect_id: DefectId::new(),
            quantity_affected,
            user_id: None,
        })
        .await
        .unwrap()
}

/// 检验单 NEW，缺陷 #1 数量 3，缺陷 #2 数量 0
pub async fn inspection_with_two_defects(
    handler: &ServiceHandler,
    code: &str,
) -> (InspectionId, InspectionDefectId, InspectionDefectId) {
    let inspection_id = create_inspection(handler, code).await;
    let first = record_defect(handler, inspection_id, 3).await;
    let second = record_defect(handler, inspection_id, 0).await;
    (inspection_id, first, second)
}

/// 可切换为保存失败的仓储，其余操作委托给内存存储
pub struct FailingSaveStore {
    inner: Arc<InMemoryInspectionStore>,
    fail_saves: AtomicBool,
}

impl FailingSaveStore {
    pub fn new(inner: Arc<InMemoryInspectionStore>) -> Self {
        Self {
            inner,
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset during commit"));
        }
        Ok(())
    }

    fn inspections(&self) -> &dyn InspectionRepository {
        self.inner.as_ref()
    }

    fn defects(&self) -> &dyn InspectionDefectRepository {
        self.inner.as_ref()
    }
}

#[async_trait]
impl Repository<Inspection, InspectionId> for FailingSaveStore {
    async fn find_by_id(&self, id: &InspectionId) -> AppResult<Option<Inspection>> {
        self.inspections().find_by_id(id).await
    }

    async fn save(&self, entity: &Inspection) -> AppResult<Inspection> {
        self.check()?;
        self.inspections().save(entity).await
    }

    async fn delete(&self, id: &InspectionId) -> AppResult<()> {
        self.inspections().delete(id).await
    }

    async fn exists(&self, id: &InspectionId) -> AppResult<bool> {
        self.inspections().exists(id).await
    }
}

#[async_trait]
impl InspectionRepository for FailingSaveStore {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Inspection>> {
        self.inspections().find_by_code(code).await
    }

    async fn exists_by_code(&self, code: &str) -> AppResult<bool> {
        self.inspections().exists_by_code(code).await
    }
}

#[async_trait]
impl Repository<InspectionDefect, InspectionDefectId> for FailingSaveStore {
    async fn find_by_id(&self, id: &InspectionDefectId) -> AppResult<Option<InspectionDefect>> {
        self.defects().find_by_id(id).await
    }

    async fn save(&self, entity: &InspectionDefect) -> AppResult<InspectionDefect> {
        self.check()?;
        self.defects().save(entity).await
    }

    async fn delete(&self, id: &InspectionDefectId) -> AppResult<()> {
        self.defects().delete(id).await
    }

    async fn exists(&self, id: &InspectionDefectId) -> AppResult<bool> {
        self.defects().exists(id).await
    }
}

#[async_trait]
impl InspectionDefectRepository for FailingSaveStore {
    async fn find_by_inspection(
        &self,
        inspection_id: &InspectionId,
    ) -> AppResult<Vec<InspectionDefect>> {
        self.defects().find_by_inspection(inspection_id).await
    }
}

pub struct FailingHarness {
    pub handler: ServiceHandler,
    pub store: Arc<FailingSaveStore>,
    pub inner: Arc<InMemoryInspectionStore>,
    pub events: Arc<InMemoryEventBus>,
}

pub fn failing_harness() -> FailingHarness {
    let inner = Arc::new(InMemoryInspectionStore::new());
    let store = Arc::new(FailingSaveStore::new(inner.clone()));
    let events = Arc::new(InMemoryEventBus::new());
    let handler = ServiceHandler::new(
        store.clone(),
        store.clone(),
        inner.clone(),
        Arc::new(mf_qi::infrastructure::locking::KeyedLockManager::new()),
        events.clone(),
        test_config(true).lifecycle,
    );
    FailingHarness {
        handler,
        store,
        inner,
        events,
    }
}

/// 使用给定锁实现与超时装配处理器
pub fn handler_with_lock(
    store: Arc<InMemoryInspectionStore>,
    locks: Arc<dyn AggregateLock>,
    lock_timeout_ms: u64,
) -> ServiceHandler {
    ServiceHandler::new(
        store.clone(),
        store.clone(),
        store,
        locks,
        Arc::new(InMemoryEventBus::new()),
        LifecycleConfig {
            lock_timeout_ms,
            publish_events: true,
        },
    )
}
