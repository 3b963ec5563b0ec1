//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;
use unarchive_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const PUBLISH_ERROR: i32 = 5003;
}

/// Server startup failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Failed to register method: {0}")]
    Register(String),
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = if err.is_validation() {
        code::VALIDATION_ERROR
    } else if err.is_not_found() {
        code::NOT_FOUND
    } else if err.is_conflict() {
        code::CONFLICT
    } else {
        match err {
            AppError::Database(_) => code::DB_ERROR,
            AppError::Publish(_) => code::PUBLISH_ERROR,
            _ => code::INTERNAL_ERROR,
        }
    };

    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unarchive_core::domain::{DomainError, JobStatus};

    #[test]
    fn test_error_codes() {
        let cases = [
            (AppError::Validation("bad".into()), code::VALIDATION_ERROR),
            (
                AppError::Domain(DomainError::UnknownStatus("DONE".into())),
                code::VALIDATION_ERROR,
            ),
            (AppError::NotFound("missing".into()), code::NOT_FOUND),
            (
                AppError::Domain(DomainError::InvalidStatusTransition {
                    from: JobStatus::Succeeded,
                    to: JobStatus::Failed,
                }),
                code::CONFLICT,
            ),
            (AppError::Conflict("dup".into()), code::CONFLICT),
            (AppError::Database("locked".into()), code::DB_ERROR),
            (AppError::Publish("down".into()), code::PUBLISH_ERROR),
            (AppError::Internal("boom".into()), code::INTERNAL_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(to_rpc_error(err).code(), expected);
        }
    }
}
