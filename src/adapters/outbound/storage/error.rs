use crate::domain::errors::ClientError;
use thiserror::Error as ThisError;

/// Infrastructure-level failures of a storage adapter, mapped to domain
/// `ClientError` at the port boundary.
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Bucket not empty: {0}")]
    BucketNotEmpty(String),

    #[error("Access denied for '{operation}' on bucket: {bucket}")]
    AccessDenied { bucket: String, operation: String },

    #[error("Unexpected response to '{operation}': {status} - {message}")]
    UnexpectedStatus {
        operation: String,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Convert infrastructure StoreError to domain ClientError
impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Transport(transport_err) => ClientError::InfrastructureError {
                message: format!("HTTP request failed: {}", transport_err),
                source: Some(transport_err.to_string()),
            },
            StoreError::Xml(message) => ClientError::InvalidResponse {
                operation: "parse-xml".to_string(),
                message,
            },
            StoreError::BucketNotFound(bucket) => ClientError::BucketNotFound { bucket },
            StoreError::BucketNotEmpty(bucket) => ClientError::BucketNotEmpty { bucket },
            StoreError::AccessDenied { bucket, operation } => {
                ClientError::AccessDenied { bucket, operation }
            }
            StoreError::UnexpectedStatus {
                operation,
                status,
                message,
            } => ClientError::InfrastructureError {
                message: format!("'{}' returned HTTP {}: {}", operation, status, message),
                source: None,
            },
            StoreError::Other(message) => ClientError::InternalError { message },
        }
    }
}
