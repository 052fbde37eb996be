use crate::{
    domain::{
        errors::ClientResult,
        models::{DeletionBatch, DeletionError, PaginationCursor},
        value_objects::BucketName,
    },
    ports::{services::TeardownService, storage::ObjectStorageClient},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Implementation of the drain-and-delete orchestrator.
///
/// Strictly sequential: one listing, one batch delete, repeat while the
/// listing is truncated, then one bucket deletion. The caller must ensure no
/// other writer mutates the bucket during the operation; a concurrent writer
/// can make the listing re-observe deleted items or leave stragglers behind
/// the final page, and neither is detected here.
#[derive(Clone)]
pub struct TeardownServiceImpl {
    client: Arc<dyn ObjectStorageClient>,
}

impl TeardownServiceImpl {
    pub fn new(client: Arc<dyn ObjectStorageClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TeardownService for TeardownServiceImpl {
    async fn force_delete_bucket(&self, bucket: &BucketName) -> ClientResult<Vec<DeletionError>> {
        let mut cursor = PaginationCursor::default();
        // The listing must run at least once even for an empty bucket.
        let mut has_more = true;

        while has_more {
            let page = self.client.list_object_versions(bucket, &cursor).await?;
            has_more = page.is_truncated;
            cursor = page.next_cursor();

            let batch = DeletionBatch::from_listed(page.deletable());
            debug!(
                bucket = %bucket,
                items = batch.len(),
                truncated = has_more,
                "listed version page"
            );

            if !batch.is_empty() {
                let errors = self.client.delete_objects(bucket, &batch).await?;
                if !errors.is_empty() {
                    // Partial failure aborts the whole operation: the bucket
                    // is left partially emptied and is not deleted.
                    warn!(
                        bucket = %bucket,
                        failed = errors.len(),
                        "batch delete reported item failures, aborting teardown"
                    );
                    return Ok(errors);
                }
            }
        }

        self.client.delete_bucket(bucket).await?;
        info!(bucket = %bucket, "bucket deleted");

        Ok(Vec::new())
    }
}
