use crate::metrics_source::MetricsError;
use crate::model::DeltaAtError;
use crate::notification::PublishError;
use crate::store::StoreError;
use thiserror::Error;

/// Failure taxonomy surfaced by both core engines.
///
/// The engines never retry internally; every failure carries enough
/// classification for the caller to decide retry vs abandon. `Conflict` is
/// expected and frequent (stale deltas), not an operator-attention error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Malformed or unsupported request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// No such appointment, company, or publicly held register.
    #[error("not found: {0}")]
    NotFound(String),
    /// Stale delta on upsert or delete; nothing was mutated.
    #[error("stale delta: {0}")]
    Conflict(String),
    /// Record store unreachable; the whole operation is safe to retry.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// A downstream dependency failed after state may already have changed.
    /// Callers must treat this as "data changed, notification may be
    /// missing", not "nothing happened".
    #[error("bad gateway: {0}")]
    BadGateway(String),
    /// Persistent store-side failure; retrying will not help.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Transient(msg) => Self::Unavailable(msg),
            StoreError::Persistent(msg) => Self::Internal(msg),
        }
    }
}

impl From<MetricsError> for ServiceError {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::CompanyNotFound(company_number) => {
                Self::NotFound(format!("company [{company_number}] unknown to metrics source"))
            }
            MetricsError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<PublishError> for ServiceError {
    fn from(err: PublishError) -> Self {
        Self::BadGateway(err.to_string())
    }
}

impl From<DeltaAtError> for ServiceError {
    fn from(err: DeltaAtError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
