//! 检验单生命周期测试

mod support;

use common::UserId;
use errors::AppError;
use mf_qi::application::{
    CancelInspectionCommand, ChangeInspectionStatusCommand, CloseInspectionCommand,
    ConfirmInspectionCommand, CreateInspectionCommand, DeleteInspectionCommand,
    GetDefectLinkQuery, GetInspectionByCodeQuery, GetInspectionQuery, ListDefectLinksQuery,
    RecordDefectCommand, RecordMeasurementCommand, ServiceHandler,
};
use mf_qi::domain::{
    DefectId, Inspection, InspectionId, InspectionResult, InspectionStatus, InspectionType,
    QualityStandard, QualityStandardId,
};

use support::*;

async fn confirm(
    handler: &ServiceHandler,
    inspection_id: InspectionId,
) -> Result<Inspection, AppError> {
    handler
        .confirm_inspection(ConfirmInspectionCommand {
            inspection_id,
            user_id: None,
        })
        .await
}

async fn cancel(
    handler: &ServiceHandler,
    inspection_id: InspectionId,
) -> Result<Inspection, AppError> {
    handler
        .cancel_inspection(CancelInspectionCommand {
            inspection_id,
            user_id: None,
        })
        .await
}

async fn close(
    handler: &ServiceHandler,
    inspection_id: InspectionId,
) -> Result<Inspection, AppError> {
    handler
        .close_inspection(CloseInspectionCommand {
            inspection_id,
            user_id: None,
        })
        .await
}

async fn change_status(
    handler: &ServiceHandler,
    inspection_id: InspectionId,
    new_status: InspectionStatus,
) -> Result<Inspection, AppError> {
    handler
        .change_inspection_status(ChangeInspectionStatusCommand {
            inspection_id,
            new_status: Some(new_status),
            user_id: None,
        })
        .await
}

async fn get(handler: &ServiceHandler, inspection_id: InspectionId) -> Inspection {
    handler
        .get_inspection(GetInspectionQuery { inspection_id })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_confirm_cascades_only_to_defects_with_quantity() {
    let module = module();
    let handler = module.handler.as_ref();
    let (inspection_id, with_qty, without_qty) =
        inspection_with_two_defects(handler, "QI-CONFIRM").await;

    let inspection = confirm(handler, inspection_id).await.unwrap();

    assert_eq!(inspection.status(), InspectionStatus::Confirmed);
    assert!(inspection.is_confirmed());
    let first = inspection.defect(&with_qty).unwrap();
    let second = inspection.defect(&without_qty).unwrap();
    assert!(first.is_confirmed());
    assert!(!second.is_confirmed());
    // 级联只置 confirmed，不改变缺陷状态
    assert_eq!(first.status(), InspectionStatus::New);
    assert_eq!(second.status(), InspectionStatus::New);
}

#[tokio::test]
async fn test_change_status_to_confirmed_cascades_to_all_defects() {
    let module = module();
    let handler = module.handler.as_ref();
    let (inspection_id, with_qty, without_qty) =
        inspection_with_two_defects(handler, "QI-CHANGE").await;

    let inspection = change_status(handler, inspection_id, InspectionStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(inspection.status(), InspectionStatus::Confirmed);
    assert!(inspection.is_confirmed());
    assert!(inspection.defect(&with_qty).unwrap().is_confirmed());
    assert!(inspection.defect(&without_qty).unwrap().is_confirmed());
}

#[tokio::test]
async fn test_change_status_to_confirmed_rejected_unless_new() {
    let module = module();
    let handler = module.handler.as_ref();
    let (inspection_id, _, without_qty) = inspection_with_two_defects(handler, "QI-RECONF").await;
    confirm(handler, inspection_id).await.unwrap();
    let before = get(handler, inspection_id).await;

    let err = change_status(handler, inspection_id, InspectionStatus::Confirmed)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AppError::InvalidTransition("Only NEW inspections can be confirmed".to_string())
    );
    let after = get(handler, inspection_id).await;
    assert_eq!(after, before);
    assert!(!after.defect(&without_qty).unwrap().is_confirmed());
}

#[tokio::test]
async fn test_close_then_cancel_fails_and_status_stays_closed() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-2").await;
    confirm(handler, inspection_id).await.unwrap();

    let closed = close(handler, inspection_id).await.unwrap();
    assert_eq!(closed.status(), InspectionStatus::Closed);

    let err = cancel(handler, inspection_id).await.unwrap_err();
    assert_eq!(
        err,
        AppError::InvalidTransition("Only NEW or CONFIRMED inspections can be cancelled".to_string())
    );
    assert_eq!(get(handler, inspection_id).await.status(), InspectionStatus::Closed);
}

#[tokio::test]
async fn test_closed_inspection_cannot_change_status() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-CLOSED").await;
    confirm(handler, inspection_id).await.unwrap();
    close(handler, inspection_id).await.unwrap();

    for status in [
        InspectionStatus::New,
        InspectionStatus::Confirmed,
        InspectionStatus::Closed,
        InspectionStatus::Cancelled,
    ] {
        let err = change_status(handler, inspection_id, status).await.unwrap_err();
        assert_eq!(
            err,
            AppError::InvalidTransition("Closed inspections cannot change status".to_string())
        );
    }
    assert_eq!(get(handler, inspection_id).await.status(), InspectionStatus::Closed);
}

#[tokio::test]
async fn test_confirm_is_idempotent_and_allowed_from_any_state() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-IDEMP").await;

    let once = confirm(handler, inspection_id).await.unwrap();
    let twice = confirm(handler, inspection_id).await.unwrap();
    assert_eq!(once.status(), twice.status());
    assert_eq!(once.is_confirmed(), twice.is_confirmed());

    // 快捷入口不校验前置状态，CLOSED 也会被重新确认
    close(handler, inspection_id).await.unwrap();
    let reopened = confirm(handler, inspection_id).await.unwrap();
    assert_eq!(reopened.status(), InspectionStatus::Confirmed);
    assert!(reopened.is_confirmed());
}

#[tokio::test]
async fn test_cancel_and_close_preconditions() {
    let module = module();
    let handler = module.handler.as_ref();

    let fresh = create_inspection(handler, "QI-NEW").await;
    let err = close(handler, fresh).await.unwrap_err();
    assert_eq!(
        err,
        AppError::InvalidTransition("Only CONFIRMED inspections can be closed".to_string())
    );
    let cancelled = cancel(handler, fresh).await.unwrap();
    assert_eq!(cancelled.status(), InspectionStatus::Cancelled);
    assert!(!cancelled.is_confirmed());
    assert!(cancel(handler, fresh).await.is_err());

    let confirmed = create_inspection(handler, "QI-CONF").await;
    confirm(handler, confirmed).await.unwrap();
    let cancelled = cancel(handler, confirmed).await.unwrap();
    assert_eq!(cancelled.status(), InspectionStatus::Cancelled);
    assert!(cancelled.is_confirmed());
}

#[tokio::test]
async fn test_change_status_applies_other_targets_without_whitelist() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-FREE").await;
    cancel(handler, inspection_id).await.unwrap();

    let reopened = change_status(handler, inspection_id, InspectionStatus::New)
        .await
        .unwrap();
    assert_eq!(reopened.status(), InspectionStatus::New);

    let closed = change_status(handler, inspection_id, InspectionStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.status(), InspectionStatus::Closed);
    assert!(!closed.is_confirmed());
}

#[tokio::test]
async fn test_null_status_is_rejected_before_load() {
    let module = module();
    let handler = module.handler.as_ref();

    // 不存在的检验单也先报参数错误
    let err = handler
        .change_inspection_status(ChangeInspectionStatusCommand {
            inspection_id: InspectionId::new(),
            new_status: None,
            user_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err, AppError::Validation("Status must not be null".to_string()));
}

#[tokio::test]
async fn test_unknown_inspection_is_not_found() {
    let module = module();
    let handler = module.handler.as_ref();
    let missing = InspectionId::new();

    assert!(matches!(confirm(handler, missing).await, Err(AppError::NotFound(_))));
    assert!(matches!(cancel(handler, missing).await, Err(AppError::NotFound(_))));
    assert!(matches!(close(handler, missing).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        change_status(handler, missing, InspectionStatus::New).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_save_leaves_inspection_and_children_unchanged() {
    let harness = failing_harness();
    let handler = &harness.handler;
    let (inspection_id, with_qty, without_qty) =
        inspection_with_two_defects(handler, "QI-ATOMIC").await;
    let before = get(handler, inspection_id).await;
    harness.events.clear().await;

    harness.store.fail_saves(true);
    let err = change_status(handler, inspection_id, InspectionStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert!(confirm(handler, inspection_id).await.is_err());

    let after = get(handler, inspection_id).await;
    assert_eq!(after, before);
    assert_eq!(after.status(), InspectionStatus::New);
    assert!(!after.is_confirmed());
    assert!(!after.defect(&with_qty).unwrap().is_confirmed());
    assert!(!after.defect(&without_qty).unwrap().is_confirmed());
    assert!(harness.events.get_events().await.is_empty());

    harness.store.fail_saves(false);
    let confirmed = confirm(handler, inspection_id).await.unwrap();
    assert_eq!(confirmed.version(), before.version() + 1);
}

#[tokio::test]
async fn test_create_and_query_inspection() {
    let module = module();
    let handler = module.handler.as_ref();
    let user = UserId::new();

    let mut cmd = CreateInspectionCommand::new("QI-NEW-1", InspectionType::Incoming);
    cmd.user_id = Some(user.clone());
    cmd.quantity_inspected = 100;
    cmd.quantity_accepted = 98;
    cmd.quantity_rejected = 2;
    cmd.result = Some(InspectionResult::ConditionallyAccepted);
    cmd.notes = Some("first article".to_string());
    let inspection_id = handler.create_inspection(cmd).await.unwrap();

    let inspection = get(handler, inspection_id).await;
    assert_eq!(inspection.code(), "QI-NEW-1");
    assert_eq!(inspection.status(), InspectionStatus::New);
    assert!(!inspection.is_confirmed());
    assert_eq!(inspection.quantity_inspected(), 100);
    assert_eq!(inspection.quantity_rejected(), 2);
    assert_eq!(inspection.result(), InspectionResult::ConditionallyAccepted);
    assert_eq!(inspection.notes(), Some("first article"));
    assert_eq!(inspection.audit_info().created_by, Some(user));

    let by_code = handler
        .get_inspection_by_code(GetInspectionByCodeQuery {
            code: "QI-NEW-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(by_code.id(), &inspection_id);

    let duplicate = handler
        .create_inspection(CreateInspectionCommand::new("QI-NEW-1", InspectionType::Final))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let invalid = handler
        .create_inspection(CreateInspectionCommand::new("", InspectionType::Final))
        .await
        .unwrap_err();
    assert!(matches!(invalid, AppError::Validation(_)));
}

#[tokio::test]
async fn test_acting_user_is_stamped_on_transition() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-AUDIT").await;
    let user = UserId::new();

    let confirmed = handler
        .confirm_inspection(ConfirmInspectionCommand {
            inspection_id,
            user_id: Some(user.clone()),
        })
        .await
        .unwrap();

    assert_eq!(confirmed.audit_info().updated_by, Some(user));
}

#[tokio::test]
async fn test_measurements_follow_standard_bounds_and_cascade() {
    let module = module();
    let handler = module.handler.as_ref();
    let standard = QualityStandard::new("DIA", "Diameter")
        .with_bounds(Some(9.5), Some(10.5))
        .with_unit("mm");
    let standards: &dyn mf_qi::domain::QualityStandardRepository = module.store.as_ref();
    ports::Repository::save(standards, &standard).await.unwrap();

    let inspection_id = create_inspection(handler, "QI-MEAS").await;
    for value in [10.5, 11.0] {
        handler
            .record_measurement(RecordMeasurementCommand {
                inspection_id,
                quality_standard_id: standard.id,
                measured_value: value,
                user_id: None,
            })
            .await
            .unwrap();
    }

    let inspection = get(handler, inspection_id).await;
    let within: Vec<bool> = inspection
        .measurements()
        .iter()
        .map(|m| m.is_within_spec())
        .collect();
    assert_eq!(within, vec![true, false]);

    let confirmed = confirm(handler, inspection_id).await.unwrap();
    assert!(confirmed.measurements().iter().all(|m| m.is_confirmed()));

    // 确认后不可再登记
    let err = handler
        .record_measurement(RecordMeasurementCommand {
            inspection_id,
            quality_standard_id: standard.id,
            measured_value: 10.0,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let missing_standard = handler
        .record_measurement(RecordMeasurementCommand {
            inspection_id,
            quality_standard_id: QualityStandardId::new(),
            measured_value: 10.0,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_standard, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_record_defect_rejects_negative_quantity_and_closed_inspections() {
    let module = module();
    let handler = module.handler.as_ref();
    let inspection_id = create_inspection(handler, "QI-REC").await;

    let negative = handler
        .record_defect(RecordDefectCommand {
            inspection_id,
            defect_id: DefectId::new(),
            quantity_affected: -1,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(negative, AppError::Validation(_)));

    cancel(handler, inspection_id).await.unwrap();
    let closed = handler
        .record_defect(RecordDefectCommand {
            inspection_id,
            defect_id: DefectId::new(),
            quantity_affected: 1,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(closed, AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_removes_inspection_and_children() {
    let module = module();
    let handler = module.handler.as_ref();
    let (inspection_id, with_qty, _) = inspection_with_two_defects(handler, "QI-DEL").await;
    confirm(handler, inspection_id).await.unwrap();

    handler
        .delete_inspection(DeleteInspectionCommand {
            inspection_id,
            user_id: None,
        })
        .await
        .unwrap();

    assert!(matches!(
        handler.get_inspection(GetInspectionQuery { inspection_id }).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        handler
            .get_defect_link(GetDefectLinkQuery {
                defect_link_id: with_qty
            })
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        handler
            .list_defect_links(ListDefectLinksQuery { inspection_id })
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        handler
            .delete_inspection(DeleteInspectionCommand {
                inspection_id,
                user_id: None,
            })
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_reopened_inspection_keeps_measurements_confirmed() {
    let module = module();
    let handler = module.handler.as_ref();
    let standard = QualityStandard::new("WGT", "Weight").with_bounds(Some(1.0), Some(2.0));
    let standards: &dyn mf_qi::domain::QualityStandardRepository = module.store.as_ref();
    ports::Repository::save(standards, &standard).await.unwrap();

    let inspection_id = create_inspection(handler, "QI-REOPEN").await;
    let record = |measured_value: f64| RecordMeasurementCommand {
        inspection_id,
        quality_standard_id: standard.id,
        measured_value,
        user_id: None,
    };
    handler.record_measurement(record(1.5)).await.unwrap();
    confirm(handler, inspection_id).await.unwrap();

    let reopened = change_status(handler, inspection_id, InspectionStatus::New)
        .await
        .unwrap();
    assert_eq!(reopened.status(), InspectionStatus::New);
    assert!(reopened.is_confirmed());

    let err = handler.record_measurement(record(1.8)).await.unwrap_err();
    assert_eq!(
        err,
        AppError::Validation(
            "Measurements cannot be recorded on inspections that have been confirmed".to_string()
        )
    );
    let err = handler
        .record_defect(RecordDefectCommand {
            inspection_id,
            defect_id: DefectId::new(),
            quantity_affected: 1,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let closed = change_status(handler, inspection_id, InspectionStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.status(), InspectionStatus::Closed);
    assert_eq!(closed.measurements().len(), 1);
    assert!(closed.measurements().iter().all(|m| m.is_confirmed()));
}
