use crate::domain::{
    errors::ClientResult,
    models::{DeletionBatch, DeletionError, ObjectVersionPage, PaginationCursor},
    value_objects::BucketName,
};
use async_trait::async_trait;

/// Port for the object storage provider.
///
/// The teardown orchestrator consumes exactly these three primitives; the
/// implementation owns authentication, timeouts, and any retry policy.
#[async_trait]
pub trait ObjectStorageClient: Send + Sync + 'static {
    /// List one page of object versions and delete markers.
    ///
    /// The cursor is the resume point from the previous page; an initial
    /// cursor (no markers) starts the listing from the beginning.
    async fn list_object_versions(
        &self,
        bucket: &BucketName,
        cursor: &PaginationCursor,
    ) -> ClientResult<ObjectVersionPage>;

    /// Delete every referenced version in one call.
    ///
    /// Returns the per-item failures reported by the provider; an empty list
    /// means the whole batch was deleted. A call-level failure is an `Err`.
    async fn delete_objects(
        &self,
        bucket: &BucketName,
        batch: &DeletionBatch,
    ) -> ClientResult<Vec<DeletionError>>;

    /// Delete the bucket itself. Fails if the bucket still holds objects.
    async fn delete_bucket(&self, bucket: &BucketName) -> ClientResult<()>;
}
