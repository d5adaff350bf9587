//! 服务错误类型

use errors::AppError;
use thiserror::Error;

use crate::domain::lifecycle::LifecycleError;

/// 领域层错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("{0}")]
    InvalidInput(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<LifecycleError> for AppError {
    fn from(error: LifecycleError) -> Self {
        AppError::InvalidTransition(error.reason)
    }
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Lifecycle(e) => e.into(),
            ServiceError::InvalidInput(msg) => AppError::Validation(msg),
        }
    }
}
