/// Call-level failures of the storage client.
///
/// These abort the whole teardown; per-item deletion failures are carried as
/// data instead (see `DeletionError`).
#[derive(Debug, Clone)]
pub enum ClientError {
    /// The bucket does not exist or is not visible to the caller
    BucketNotFound { bucket: String },

    /// The bucket still holds objects when deletion was attempted
    BucketNotEmpty { bucket: String },

    /// The caller is not allowed to perform the operation
    AccessDenied { bucket: String, operation: String },

    /// The provider returned a payload the adapter could not interpret
    InvalidResponse { operation: String, message: String },

    /// Transport or provider-side failure
    InfrastructureError {
        message: String,
        source: Option<String>, // stringified to keep the error Clone
    },

    /// Generic client error
    InternalError { message: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::BucketNotFound { bucket } => {
                write!(f, "Bucket not found: {}", bucket)
            }
            ClientError::BucketNotEmpty { bucket } => {
                write!(f, "Bucket not empty: {}", bucket)
            }
            ClientError::AccessDenied { bucket, operation } => {
                write!(
                    f,
                    "Access denied for operation '{}' on bucket: {}",
                    operation, bucket
                )
            }
            ClientError::InvalidResponse { operation, message } => {
                write!(f, "Invalid response to '{}': {}", operation, message)
            }
            ClientError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
            ClientError::InternalError { message } => {
                write!(f, "Internal client error: {}", message)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Result type for storage client operations
pub type ClientResult<T> = Result<T, ClientError>;
