use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{ClientError, ClientResult},
        models::{
            DeletionBatch, DeletionError, ListedVersion, ObjectVersionPage, PaginationCursor,
            VersionedObjectRef, MAX_DELETE_BATCH,
        },
        value_objects::BucketName,
    },
    ports::storage::ObjectStorageClient,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Version,
    DeleteMarker,
}

#[derive(Clone)]
struct StoredEntry {
    kind: EntryKind,
    entry: ListedVersion,
}

#[derive(Default)]
struct BucketContents {
    entries: Vec<StoredEntry>,
}

#[derive(Default)]
struct ClientState {
    buckets: HashMap<String, BucketContents>,
    denied: Vec<DeletionError>,
    fail_next_list: Option<ClientError>,
    fail_next_delete_objects: Option<ClientError>,
    fail_next_delete_bucket: Option<ClientError>,
    list_calls: usize,
    delete_objects_calls: usize,
    delete_bucket_calls: usize,
    list_cursors: Vec<PaginationCursor>,
    submitted_batches: Vec<Vec<VersionedObjectRef>>,
}

/// In-memory implementation of ObjectStorageClient for testing and
/// development.
///
/// Holds versioned bucket contents behind an RwLock, paginates listings with
/// a configurable page size, and records every call so tests can assert on
/// call counts, cursors, and submitted batches. Individual items can be
/// marked as undeletable to simulate per-item batch failures, and the next
/// call of each operation can be armed to fail outright.
#[derive(Clone)]
pub struct InMemoryStorageClient {
    page_size: usize,
    state: Arc<RwLock<ClientState>>,
}

impl InMemoryStorageClient {
    pub fn new() -> Self {
        Self::with_page_size(MAX_DELETE_BATCH)
    }

    /// A client whose listings return at most `page_size` items per page.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_DELETE_BATCH),
            state: Arc::new(RwLock::new(ClientState::default())),
        }
    }

    pub async fn create_bucket(&self, bucket: &BucketName) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.as_str().to_string())
            .or_default();
    }

    pub async fn add_version(&self, bucket: &BucketName, key: &str, version_id: &str) {
        self.add_entry(bucket, EntryKind::Version, ListedVersion::new(key, version_id))
            .await;
    }

    pub async fn add_delete_marker(&self, bucket: &BucketName, key: &str, version_id: &str) {
        self.add_entry(
            bucket,
            EntryKind::DeleteMarker,
            ListedVersion::new(key, version_id),
        )
        .await;
    }

    /// Seed a version entry exactly as the provider would report it,
    /// including absent fields.
    pub async fn add_raw_version(&self, bucket: &BucketName, entry: ListedVersion) {
        self.add_entry(bucket, EntryKind::Version, entry).await;
    }

    async fn add_entry(&self, bucket: &BucketName, kind: EntryKind, entry: ListedVersion) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.as_str().to_string())
            .or_default()
            .entries
            .push(StoredEntry { kind, entry });
    }

    /// Make delete_objects report the given per-item error instead of
    /// deleting the matching item.
    pub async fn deny_deletion(&self, error: DeletionError) {
        self.state.write().await.denied.push(error);
    }

    pub async fn fail_next_list(&self, error: ClientError) {
        self.state.write().await.fail_next_list = Some(error);
    }

    pub async fn fail_next_delete_objects(&self, error: ClientError) {
        self.state.write().await.fail_next_delete_objects = Some(error);
    }

    pub async fn fail_next_delete_bucket(&self, error: ClientError) {
        self.state.write().await.fail_next_delete_bucket = Some(error);
    }

    pub async fn list_calls(&self) -> usize {
        self.state.read().await.list_calls
    }

    pub async fn delete_objects_calls(&self) -> usize {
        self.state.read().await.delete_objects_calls
    }

    pub async fn delete_bucket_calls(&self) -> usize {
        self.state.read().await.delete_bucket_calls
    }

    /// Cursors of every listing request, in call order.
    pub async fn list_cursors(&self) -> Vec<PaginationCursor> {
        self.state.read().await.list_cursors.clone()
    }

    /// Item references of every delete_objects call, in call order.
    pub async fn submitted_batches(&self) -> Vec<Vec<VersionedObjectRef>> {
        self.state.read().await.submitted_batches.clone()
    }

    pub async fn bucket_exists(&self, bucket: &BucketName) -> bool {
        self.state.read().await.buckets.contains_key(bucket.as_str())
    }

    pub async fn remaining_items(&self, bucket: &BucketName) -> usize {
        self.state
            .read()
            .await
            .buckets
            .get(bucket.as_str())
            .map_or(0, |contents| contents.entries.len())
    }
}

impl Default for InMemoryStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorageClient for InMemoryStorageClient {
    async fn list_object_versions(
        &self,
        bucket: &BucketName,
        cursor: &PaginationCursor,
    ) -> ClientResult<ObjectVersionPage> {
        let mut state = self.state.write().await;
        state.list_calls += 1;
        state.list_cursors.push(cursor.clone());

        if let Some(err) = state.fail_next_list.take() {
            return Err(err);
        }

        let contents =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| ClientError::BucketNotFound {
                    bucket: bucket.to_string(),
                })?;

        // Markers name the last entry of the previous page.
        let start = if cursor.is_initial() {
            0
        } else {
            contents
                .entries
                .iter()
                .position(|stored| {
                    stored.entry.key == cursor.key_marker
                        && stored.entry.version_id == cursor.version_id_marker
                })
                .map_or(0, |idx| idx + 1)
        };

        let end = (start + self.page_size).min(contents.entries.len());
        let window = &contents.entries[start.min(end)..end];

        let mut page = ObjectVersionPage {
            is_truncated: end < contents.entries.len(),
            ..Default::default()
        };

        for stored in window {
            match stored.kind {
                EntryKind::Version => page.versions.push(stored.entry.clone()),
                EntryKind::DeleteMarker => page.delete_markers.push(stored.entry.clone()),
            }
        }

        if page.is_truncated {
            if let Some(last) = window.last() {
                page.next_key_marker = last.entry.key.clone();
                page.next_version_id_marker = last.entry.version_id.clone();
            }
        }

        Ok(page)
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        batch: &DeletionBatch,
    ) -> ClientResult<Vec<DeletionError>> {
        let mut state = self.state.write().await;
        state.delete_objects_calls += 1;
        state.submitted_batches.push(batch.refs().to_vec());

        if let Some(err) = state.fail_next_delete_objects.take() {
            return Err(err);
        }

        let denied = state.denied.clone();
        let contents =
            state
                .buckets
                .get_mut(bucket.as_str())
                .ok_or_else(|| ClientError::BucketNotFound {
                    bucket: bucket.to_string(),
                })?;

        let mut errors = Vec::new();
        for item in batch.refs() {
            if let Some(error) = denied
                .iter()
                .find(|d| d.key == item.key && d.version_id == item.version_id)
            {
                errors.push(error.clone());
                continue;
            }

            contents.entries.retain(|stored| {
                !(stored.entry.key.clone().unwrap_or_default() == item.key
                    && stored.entry.version_id.clone().unwrap_or_default() == item.version_id)
            });
        }

        Ok(errors)
    }

    async fn delete_bucket(&self, bucket: &BucketName) -> ClientResult<()> {
        let mut state = self.state.write().await;
        state.delete_bucket_calls += 1;

        if let Some(err) = state.fail_next_delete_bucket.take() {
            return Err(err);
        }

        let contents =
            state
                .buckets
                .get(bucket.as_str())
                .ok_or_else(|| ClientError::BucketNotFound {
                    bucket: bucket.to_string(),
                })?;

        if !contents.entries.is_empty() {
            return Err(ClientError::BucketNotEmpty {
                bucket: bucket.to_string(),
            });
        }

        state.buckets.remove(bucket.as_str());
        Ok(())
    }
}
