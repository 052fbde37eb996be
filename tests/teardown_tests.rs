use bucket_teardown::{
    BucketName, ClientError, DeletionError, InMemoryStorageClient, ListedVersion,
    PaginationCursor, TeardownService, TeardownServiceImpl, MAX_DELETE_BATCH,
};
use std::sync::Arc;

fn bucket(name: &str) -> BucketName {
    BucketName::new(name).unwrap()
}

fn service(client: &InMemoryStorageClient) -> TeardownServiceImpl {
    // The in-memory client shares state across clones
    TeardownServiceImpl::new(Arc::new(client.clone()))
}

#[tokio::test]
async fn empty_bucket_is_deleted_with_a_single_listing() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-empty");
    client.create_bucket(&b1).await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();

    assert!(errors.is_empty());
    assert_eq!(client.list_calls().await, 1);
    assert_eq!(client.delete_objects_calls().await, 0);
    assert_eq!(client.delete_bucket_calls().await, 1);
    assert!(!client.bucket_exists(&b1).await);
}

#[tokio::test]
async fn single_page_bucket_drains_in_one_batch() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-data");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;
    client.add_version(&b1, "b.txt", "v1").await;
    client.add_version(&b1, "c.txt", "v1").await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();

    assert!(errors.is_empty());
    assert_eq!(client.list_calls().await, 1);
    assert_eq!(client.delete_objects_calls().await, 1);
    assert_eq!(client.delete_bucket_calls().await, 1);

    let batches = client.submitted_batches().await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert!(!client.bucket_exists(&b1).await);
}

#[tokio::test]
async fn versions_are_deleted_before_delete_markers() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-ordered");
    client.create_bucket(&b1).await;
    client.add_delete_marker(&b1, "doc.txt", "m1").await;
    client.add_version(&b1, "doc.txt", "v1").await;

    service(&client).force_delete_bucket(&b1).await.unwrap();

    let batches = client.submitted_batches().await;
    assert_eq!(batches[0].len(), 2);
    // Versions come first in the batch regardless of listing interleaving
    assert_eq!(batches[0][0].version_id, "v1");
    assert_eq!(batches[0][1].version_id, "m1");
}

#[tokio::test]
async fn pagination_resumes_from_response_markers() {
    let client = InMemoryStorageClient::with_page_size(2);
    let b1 = bucket("b1-paged");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;
    client.add_version(&b1, "b.txt", "v1").await;
    client.add_version(&b1, "c.txt", "v1").await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();

    assert!(errors.is_empty());
    assert_eq!(client.list_calls().await, 2);
    assert_eq!(client.delete_objects_calls().await, 2);
    assert_eq!(client.delete_bucket_calls().await, 1);

    let cursors = client.list_cursors().await;
    assert_eq!(cursors[0], PaginationCursor::default());
    // Second request resumes from the first response's next-markers
    assert_eq!(cursors[1].key_marker.as_deref(), Some("b.txt"));
    assert_eq!(cursors[1].version_id_marker.as_deref(), Some("v1"));
}

#[tokio::test]
async fn drains_every_version_and_marker_across_pages() {
    let client = InMemoryStorageClient::with_page_size(3);
    let b1 = bucket("b1-full");
    client.create_bucket(&b1).await;
    for i in 0..7 {
        client
            .add_version(&b1, &format!("obj-{:02}", i), &format!("v{}", i))
            .await;
    }
    for i in 0..4 {
        client
            .add_delete_marker(&b1, &format!("obj-{:02}", i), &format!("m{}", i))
            .await;
    }

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();
    assert!(errors.is_empty());
    assert!(!client.bucket_exists(&b1).await);

    // Union of all batches covers the full set, without duplicates
    let mut seen: Vec<(String, String)> = client
        .submitted_batches()
        .await
        .into_iter()
        .flatten()
        .map(|r| (r.key, r.version_id))
        .collect();
    assert_eq!(seen.len(), 11);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 11);
}

#[tokio::test]
async fn batches_never_exceed_the_provider_limit() {
    // A page size above the provider limit is clamped, so even a bucket
    // with more than MAX_DELETE_BATCH items yields bounded batches.
    let client = InMemoryStorageClient::with_page_size(5000);
    let b1 = bucket("b1-oversized");
    client.create_bucket(&b1).await;
    for i in 0..1001 {
        client
            .add_version(&b1, &format!("obj-{:04}", i), "v1")
            .await;
    }

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();
    assert!(errors.is_empty());
    assert!(!client.bucket_exists(&b1).await);

    let batches = client.submitted_batches().await;
    assert!(batches.len() >= 2);
    assert!(batches.iter().all(|batch| batch.len() <= MAX_DELETE_BATCH));

    // The union still covers every item, without duplicates
    let mut seen: Vec<(String, String)> = batches
        .into_iter()
        .flatten()
        .map(|r| (r.key, r.version_id))
        .collect();
    assert_eq!(seen.len(), 1001);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 1001);
}

#[tokio::test]
async fn partial_failure_short_circuits_before_bucket_deletion() {
    let client = InMemoryStorageClient::with_page_size(2);
    let b1 = bucket("b1-stuck");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;
    client.add_version(&b1, "held.txt", "v1").await;
    client.add_version(&b1, "c.txt", "v1").await;

    let denied = DeletionError {
        key: "held.txt".to_string(),
        version_id: "v1".to_string(),
        code: "AccessDenied".to_string(),
        message: "object locked".to_string(),
    };
    client.deny_deletion(denied.clone()).await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();

    assert_eq!(errors, vec![denied]);
    // Draining stopped after the failing batch: no second listing, no
    // bucket deletion, the remainder is still there.
    assert_eq!(client.list_calls().await, 1);
    assert_eq!(client.delete_objects_calls().await, 1);
    assert_eq!(client.delete_bucket_calls().await, 0);
    assert!(client.bucket_exists(&b1).await);
    assert!(client.remaining_items(&b1).await > 0);
}

#[tokio::test]
async fn partial_failure_preserves_error_order() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-multi-fail");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "x.txt", "v1").await;
    client.add_version(&b1, "y.txt", "v1").await;

    let first = DeletionError {
        key: "x.txt".to_string(),
        version_id: "v1".to_string(),
        code: "InternalError".to_string(),
        message: "try again".to_string(),
    };
    let second = DeletionError {
        key: "y.txt".to_string(),
        version_id: "v1".to_string(),
        code: "AccessDenied".to_string(),
        message: "no".to_string(),
    };
    client.deny_deletion(first.clone()).await;
    client.deny_deletion(second.clone()).await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();
    assert_eq!(errors, vec![first, second]);
}

#[tokio::test]
async fn absent_listing_fields_are_sent_as_empty_strings() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-sparse");
    client.create_bucket(&b1).await;
    client
        .add_raw_version(
            &b1,
            ListedVersion {
                key: Some("no-version.txt".to_string()),
                version_id: None,
            },
        )
        .await;
    client
        .add_raw_version(
            &b1,
            ListedVersion {
                key: None,
                version_id: Some("v-orphan".to_string()),
            },
        )
        .await;

    let errors = service(&client).force_delete_bucket(&b1).await.unwrap();
    assert!(errors.is_empty());

    let batches = client.submitted_batches().await;
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[0][0].key, "no-version.txt");
    assert_eq!(batches[0][0].version_id, "");
    assert_eq!(batches[0][1].key, "");
    assert_eq!(batches[0][1].version_id, "v-orphan");
}

#[tokio::test]
async fn missing_bucket_fails_on_first_listing() {
    let client = InMemoryStorageClient::new();
    let gone = bucket("never-created");

    let result = service(&client).force_delete_bucket(&gone).await;

    assert!(matches!(
        result,
        Err(ClientError::BucketNotFound { .. })
    ));
    assert_eq!(client.delete_bucket_calls().await, 0);
}

#[tokio::test]
async fn second_teardown_of_same_bucket_is_a_hard_failure() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-once");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;

    let svc = service(&client);
    let errors = svc.force_delete_bucket(&b1).await.unwrap();
    assert!(errors.is_empty());
    assert!(!client.bucket_exists(&b1).await);

    // The bucket is gone; a repeat run reports not-found
    let result = svc.force_delete_bucket(&b1).await;
    assert!(matches!(result, Err(ClientError::BucketNotFound { .. })));
}

#[tokio::test]
async fn listing_failure_propagates_without_partial_result() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-net");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;
    client
        .fail_next_list(ClientError::InfrastructureError {
            message: "connection reset".to_string(),
            source: None,
        })
        .await;

    let result = service(&client).force_delete_bucket(&b1).await;

    assert!(matches!(
        result,
        Err(ClientError::InfrastructureError { .. })
    ));
    assert_eq!(client.delete_objects_calls().await, 0);
    assert_eq!(client.delete_bucket_calls().await, 0);
}

#[tokio::test]
async fn batch_delete_call_failure_propagates() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-drop");
    client.create_bucket(&b1).await;
    client.add_version(&b1, "a.txt", "v1").await;
    client
        .fail_next_delete_objects(ClientError::InfrastructureError {
            message: "timeout".to_string(),
            source: None,
        })
        .await;

    let result = service(&client).force_delete_bucket(&b1).await;

    assert!(result.is_err());
    assert_eq!(client.delete_bucket_calls().await, 0);
    assert!(client.bucket_exists(&b1).await);
}

#[tokio::test]
async fn bucket_deletion_failure_propagates() {
    let client = InMemoryStorageClient::new();
    let b1 = bucket("b1-race");
    client.create_bucket(&b1).await;
    client
        .fail_next_delete_bucket(ClientError::BucketNotEmpty {
            bucket: "b1-race".to_string(),
        })
        .await;

    let result = service(&client).force_delete_bucket(&b1).await;

    assert!(matches!(result, Err(ClientError::BucketNotEmpty { .. })));
    assert!(client.bucket_exists(&b1).await);
}
