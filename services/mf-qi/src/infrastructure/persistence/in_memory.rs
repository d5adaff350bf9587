//! 内存仓储实现
//!
//! 整个检验单聚合（含缺陷关联与测量记录）作为一个值存放，每次保存在一把写锁内
//! 完成校验与替换，因此父子记录的写入要么全部生效，要么全部不生效。

use std::collections::HashMap;

use async_trait::async_trait;
use errors::{AppError, AppResult};
use ports::Repository;
use tokio::sync::RwLock;

use crate::domain::entities::{Inspection, InspectionDefect};
use crate::domain::repositories::{
    InspectionDefectRepository, InspectionRepository, QualityStandardRepository,
};
use crate::domain::value_objects::{
    InspectionDefectId, InspectionId, QualityStandard, QualityStandardId,
};

/// 内存检验单存储
#[derive(Default)]
pub struct InMemoryInspectionStore {
    inspections: RwLock<HashMap<InspectionId, Inspection>>,
    standards: RwLock<HashMap<QualityStandardId, QualityStandard>>,
}

impl InMemoryInspectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已存储的检验单数量
    pub async fn inspection_count(&self) -> usize {
        self.inspections.read().await.len()
    }
}

/// 为新版本聚合中内容发生变化的缺陷关联递增版本号
fn bump_changed_defects(previous: Option<&Inspection>, next: &mut Inspection) {
    for defect in next.defects_mut() {
        let before = previous.and_then(|p| p.defect(defect.id()));
        match before {
            Some(before) if *before == *defect => {}
            Some(before) => defect.set_version(before.version() + 1),
            None => defect.set_version(1),
        }
    }
}

fn stale_version(what: &str, id: impl std::fmt::Display, expected: u64, actual: u64) -> AppError {
    AppError::conflict(format!(
        "{} {} was modified concurrently (expected version {}, found {})",
        what, id, expected, actual
    ))
}

// ========== 检验单 ==========

#[async_trait]
impl Repository<Inspection, InspectionId> for InMemoryInspectionStore {
    async fn find_by_id(&self, id: &InspectionId) -> AppResult<Option<Inspection>> {
        Ok(self.inspections.read().await.get(id).cloned())
    }

    async fn save(&self, entity: &Inspection) -> AppResult<Inspection> {
        let mut inspections = self.inspections.write().await;
        let previous = inspections.get(entity.id());

        match previous {
            Some(current) if current.version() != entity.version() => {
                return Err(stale_version(
                    "Inspection",
                    entity.id(),
                    entity.version(),
                    current.version(),
                ));
            }
            Some(_) => {}
            None if entity.version() != 0 => {
                return Err(AppError::not_found(format!(
                    "Inspection {} no longer exists",
                    entity.id()
                )));
            }
            None => {
                if inspections.values().any(|i| i.code() == entity.code()) {
                    return Err(AppError::conflict(format!(
                        "Inspection code {} already exists",
                        entity.code()
                    )));
                }
            }
        }

        let mut stored = entity.clone();
        bump_changed_defects(previous, &mut stored);
        stored.set_version(entity.version() + 1);
        inspections.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &InspectionId) -> AppResult<()> {
        self.inspections.write().await.remove(id);
        Ok(())
    }

    async fn exists(&self, id: &InspectionId) -> AppResult<bool> {
        Ok(self.inspections.read().await.contains_key(id))
    }
}

#[async_trait]
impl InspectionRepository for InMemoryInspectionStore {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Inspection>> {
        Ok(self
            .inspections
            .read()
            .await
            .values()
            .find(|i| i.code() == code)
            .cloned())
    }

    async fn exists_by_code(&self, code: &str) -> AppResult<bool> {
        Ok(self
            .inspections
            .read()
            .await
            .values()
            .any(|i| i.code() == code))
    }
}

// ========== 检验缺陷关联 ==========

#[async_trait]
impl Repository<InspectionDefect, InspectionDefectId> for InMemoryInspectionStore {
    async fn find_by_id(&self, id: &InspectionDefectId) -> AppResult<Option<InspectionDefect>> {
        Ok(self
            .inspections
            .read()
            .await
            .values()
            .find_map(|i| i.defect(id))
            .cloned())
    }

    /// 替换所属检验单中的缺陷关联，并递增检验单版本
    async fn save(&self, entity: &InspectionDefect) -> AppResult<InspectionDefect> {
        let mut inspections = self.inspections.write().await;
        let owner = inspections.get_mut(entity.inspection_id()).ok_or_else(|| {
            AppError::not_found(format!("Inspection {} not found", entity.inspection_id()))
        })?;
        let owner_version = owner.version();

        let current = owner.defect_mut(entity.id()).ok_or_else(|| {
            AppError::not_found(format!("Inspection defect {} not found", entity.id()))
        })?;
        if current.version() != entity.version() {
            return Err(stale_version(
                "Inspection defect",
                entity.id(),
                entity.version(),
                current.version(),
            ));
        }

        let mut stored = entity.clone();
        stored.set_version(entity.version() + 1);
        *current = stored.clone();
        owner.set_version(owner_version + 1);
        Ok(stored)
    }

    async fn delete(&self, id: &InspectionDefectId) -> AppResult<()> {
        let mut inspections = self.inspections.write().await;
        for inspection in inspections.values_mut() {
            if inspection.remove_defect(id).is_some() {
                let version = inspection.version();
                inspection.set_version(version + 1);
                break;
            }
        }
        Ok(())
    }

    async fn exists(&self, id: &InspectionDefectId) -> AppResult<bool> {
        Ok(self
            .inspections
            .read()
            .await
            .values()
            .any(|i| i.defect(id).is_some()))
    }
}

#[async_trait]
impl InspectionDefectRepository for InMemoryInspectionStore {
    async fn find_by_inspection(
        &self,
        inspection_id: &InspectionId,
    ) -> AppResult<Vec<InspectionDefect>> {
        Ok(self
            .inspections
            .read()
            .await
            .get(inspection_id)
            .map(|i| i.defects().to_vec())
            .unwrap_or_default())
    }
}

// ========== 质量标准 ==========

#[async_trait]
impl Repository<QualityStandard, QualityStandardId> for InMemoryInspectionStore {
    async fn find_by_id(&self, id: &QualityStandardId) -> AppResult<Option<QualityStandard>> {
        Ok(self.standards.read().await.get(id).cloned())
    }

    async fn save(&self, entity: &QualityStandard) -> AppResult<QualityStandard> {
        self.standards
            .write()
            .await
            .insert(entity.id, entity.clone());
        Ok(entity.clone())
    }

    async fn delete(&self, id: &QualityStandardId) -> AppResult<()> {
        self.standards.write().await.remove(id);
        Ok(())
    }

    async fn exists(&self, id: &QualityStandardId) -> AppResult<bool> {
        Ok(self.standards.read().await.contains_key(id))
    }
}

#[async_trait]
impl QualityStandardRepository for InMemoryInspectionStore {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<QualityStandard>> {
        Ok(self
            .standards
            .read()
            .await
            .values()
            .find(|s| s.code == code)
            .cloned())
    }
}
