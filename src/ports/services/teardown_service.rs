use crate::domain::{errors::ClientResult, models::DeletionError, value_objects::BucketName};
use async_trait::async_trait;

/// Service port for forced bucket teardown
#[async_trait]
pub trait TeardownService: Send + Sync + 'static {
    /// Empty the bucket of every object version and delete marker, then
    /// delete the bucket.
    ///
    /// Returns an empty list on full success. A non-empty list carries the
    /// per-item deletion failures of the first batch that reported any; in
    /// that case draining stopped immediately and the bucket was neither
    /// fully emptied nor deleted. Call-level failures of the underlying
    /// client propagate as `Err`.
    async fn force_delete_bucket(&self, bucket: &BucketName) -> ClientResult<Vec<DeletionError>>;
}
