//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use medq_core::domain::DomainError;
use medq_core::error::AppError;
use tracing::error;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INVALID_TRANSITION: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const NO_OP: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const DUPLICATE_NUMBER: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Domain(DomainError::InvalidTransition { from, to }) => ErrorObjectOwned::owned(
            code::INVALID_TRANSITION,
            format!("invalid queue status transition: {} -> {}", from, to),
            None::<()>,
        ),
        AppError::Domain(DomainError::Validation(msg)) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::NoOp(msg) => ErrorObjectOwned::owned(code::NO_OP, msg, None::<()>),
        AppError::DuplicateNumber(msg) => {
            // Retry exhaustion means the numbering serialization guarantee
            // failed; that is an alerting condition, not a user mistake.
            error!(%msg, "duplicate queue number surfaced to API");
            ErrorObjectOwned::owned(code::DUPLICATE_NUMBER, msg, None::<()>)
        }
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Throttled response for rate-limited requests
pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Rate limit exceeded. Please slow down.",
        None::<()>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_distinct_codes() {
        let invalid = to_rpc_error(AppError::Domain(DomainError::InvalidTransition {
            from: "attended".to_string(),
            to: "attending".to_string(),
        }));
        assert_eq!(invalid.code(), code::INVALID_TRANSITION);

        let noop = to_rpc_error(AppError::NoOp("nothing to transfer".to_string()));
        assert_eq!(noop.code(), code::NO_OP);

        let dup = to_rpc_error(AppError::DuplicateNumber("retries exhausted".to_string()));
        assert_eq!(dup.code(), code::DUPLICATE_NUMBER);

        let missing = to_rpc_error(AppError::NotFound("entry x".to_string()));
        assert_eq!(missing.code(), code::NOT_FOUND);
    }
}
