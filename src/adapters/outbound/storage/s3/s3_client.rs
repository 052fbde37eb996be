use async_trait::async_trait;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use reqwest::{Client, StatusCode};
use std::io::Cursor;
use std::time::Duration;

use crate::{
    adapters::outbound::storage::error::StoreError,
    domain::{
        errors::ClientResult,
        models::{DeletionBatch, DeletionError, ListedVersion, ObjectVersionPage, PaginationCursor},
        value_objects::BucketName,
    },
    ports::storage::ObjectStorageClient,
};

/// Client for an S3-compatible object storage endpoint.
///
/// Speaks the three REST operations the teardown needs: versions listing,
/// batch delete, and bucket deletion. Credentials and per-call timeouts are
/// fixed at construction; retry policy is deliberately absent.
pub struct S3StorageClient {
    client: Client,
    endpoint: String,
    access_key: String,
    secret_key: String,
}

impl S3StorageClient {
    /// Create a new client for the given endpoint
    pub fn new(endpoint: &str, access_key: &str, secret_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        S3StorageClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    fn list_url(&self, bucket: &BucketName, cursor: &PaginationCursor) -> String {
        let mut url = format!("{}/{}?versions", self.endpoint, bucket);

        if let Some(key_marker) = &cursor.key_marker {
            url.push_str(&format!("&key-marker={}", urlencoding::encode(key_marker)));
        }
        if let Some(version_marker) = &cursor.version_id_marker {
            url.push_str(&format!(
                "&version-id-marker={}",
                urlencoding::encode(version_marker)
            ));
        }

        url
    }
}

#[async_trait]
impl ObjectStorageClient for S3StorageClient {
    async fn list_object_versions(
        &self,
        bucket: &BucketName,
        cursor: &PaginationCursor,
    ) -> ClientResult<ObjectVersionPage> {
        let url = self.list_url(bucket, cursor);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await
            .map_err(StoreError::Transport)?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(StoreError::BucketNotFound(bucket.to_string()).into());
            }
            StatusCode::FORBIDDEN => {
                return Err(StoreError::AccessDenied {
                    bucket: bucket.to_string(),
                    operation: "list_object_versions".to_string(),
                }
                .into());
            }
            code if !code.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::UnexpectedStatus {
                    operation: "list_object_versions".to_string(),
                    status,
                    message,
                }
                .into());
            }
            _ => {}
        }

        let xml = response.text().await.map_err(StoreError::Transport)?;
        let page = parse_list_versions(&xml)?;

        Ok(page)
    }

    async fn delete_objects(
        &self,
        bucket: &BucketName,
        batch: &DeletionBatch,
    ) -> ClientResult<Vec<DeletionError>> {
        let url = format!("{}/{}?delete", self.endpoint, bucket);
        let body = delete_request_body(batch)?;

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .header("Content-Type", "application/xml")
            .body(body)
            .send()
            .await
            .map_err(StoreError::Transport)?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(StoreError::BucketNotFound(bucket.to_string()).into());
            }
            StatusCode::FORBIDDEN => {
                return Err(StoreError::AccessDenied {
                    bucket: bucket.to_string(),
                    operation: "delete_objects".to_string(),
                }
                .into());
            }
            code if !code.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::UnexpectedStatus {
                    operation: "delete_objects".to_string(),
                    status,
                    message,
                }
                .into());
            }
            _ => {}
        }

        let xml = response.text().await.map_err(StoreError::Transport)?;
        let errors = parse_delete_result(&xml)?;

        Ok(errors)
    }

    async fn delete_bucket(&self, bucket: &BucketName) -> ClientResult<()> {
        let url = format!("{}/{}", self.endpoint, bucket);

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await
            .map_err(StoreError::Transport)?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                Err(StoreError::BucketNotFound(bucket.to_string()).into())
            }
            StatusCode::FORBIDDEN => Err(StoreError::AccessDenied {
                bucket: bucket.to_string(),
                operation: "delete_bucket".to_string(),
            }
            .into()),
            StatusCode::CONFLICT => Err(StoreError::BucketNotEmpty(bucket.to_string()).into()),
            code if !code.is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(StoreError::UnexpectedStatus {
                    operation: "delete_bucket".to_string(),
                    status,
                    message,
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

/// Serialize a deletion batch into an S3 `<Delete>` request body
fn delete_request_body(batch: &DeletionBatch) -> Result<String, StoreError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| StoreError::Xml(format!("Failed to write XML declaration: {}", e)))?;

    writer
        .write_event(Event::Start(BytesStart::new("Delete")))
        .map_err(|e| StoreError::Xml(format!("Failed to write Delete start: {}", e)))?;

    for item in batch.refs() {
        writer
            .write_event(Event::Start(BytesStart::new("Object")))
            .map_err(|e| StoreError::Xml(format!("Failed to write Object start: {}", e)))?;

        write_text_element(&mut writer, "Key", &item.key)?;
        write_text_element(&mut writer, "VersionId", &item.version_id)?;

        writer
            .write_event(Event::End(BytesEnd::new("Object")))
            .map_err(|e| StoreError::Xml(format!("Failed to write Object end: {}", e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Delete")))
        .map_err(|e| StoreError::Xml(format!("Failed to write Delete end: {}", e)))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| StoreError::Xml(format!("Invalid UTF-8 in body: {}", e)))
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    value: &str,
) -> Result<(), StoreError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| StoreError::Xml(format!("Failed to write {} start: {}", name, e)))?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(|e| StoreError::Xml(format!("Failed to write {} text: {}", name, e)))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| StoreError::Xml(format!("Failed to write {} end: {}", name, e)))?;

    Ok(())
}

// Helper to read the text content of the element just opened
fn read_element_text<T: std::io::BufRead>(
    reader: &mut quick_xml::Reader<T>,
    buf: &mut Vec<u8>,
) -> Result<String, StoreError> {
    buf.clear();
    match reader.read_event_into(buf) {
        Ok(Event::Text(e)) => {
            let text = e
                .unescape()
                .map_err(|e| StoreError::Xml(format!("Failed to unescape XML text: {}", e)))?;
            Ok(text.into_owned())
        }
        // Immediately closed element, e.g. <Key></Key>
        Ok(Event::End(_)) => Ok(String::new()),
        Ok(other) => Err(StoreError::Xml(format!(
            "Expected text content, got {:?}",
            other
        ))),
        Err(e) => Err(StoreError::Xml(format!("Failed to read XML: {}", e))),
    }
}

/// Parse an S3 ListVersionsResult document into an ObjectVersionPage
fn parse_list_versions(xml: &str) -> Result<ObjectVersionPage, StoreError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.trim_text(true);

    let mut page = ObjectVersionPage::default();
    let mut buf = Vec::new();
    let mut text_buf = Vec::new();

    // Entry under construction and whether it is a delete marker
    let mut current: Option<(bool, ListedVersion)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Version" => current = Some((false, ListedVersion::default())),
                b"DeleteMarker" => current = Some((true, ListedVersion::default())),
                b"IsTruncated" => {
                    let text = read_element_text(&mut reader, &mut text_buf)?;
                    page.is_truncated = text.eq_ignore_ascii_case("true");
                }
                b"NextKeyMarker" => {
                    let text = read_element_text(&mut reader, &mut text_buf)?;
                    if !text.is_empty() {
                        page.next_key_marker = Some(text);
                    }
                }
                b"NextVersionIdMarker" => {
                    let text = read_element_text(&mut reader, &mut text_buf)?;
                    if !text.is_empty() {
                        page.next_version_id_marker = Some(text);
                    }
                }
                b"Key" => {
                    if let Some((_, entry)) = current.as_mut() {
                        entry.key = Some(read_element_text(&mut reader, &mut text_buf)?);
                    }
                }
                b"VersionId" => {
                    if let Some((_, entry)) = current.as_mut() {
                        entry.version_id = Some(read_element_text(&mut reader, &mut text_buf)?);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"Version" => {
                    if let Some((false, entry)) = current.take() {
                        page.versions.push(entry);
                    }
                }
                b"DeleteMarker" => {
                    if let Some((true, entry)) = current.take() {
                        page.delete_markers.push(entry);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(StoreError::Xml(format!("Failed to parse listing: {}", e))),
            _ => {}
        }

        buf.clear();
    }

    Ok(page)
}

/// Parse an S3 DeleteResult document, collecting per-item errors
fn parse_delete_result(xml: &str) -> Result<Vec<DeletionError>, StoreError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.trim_text(true);

    let mut errors = Vec::new();
    let mut buf = Vec::new();
    let mut text_buf = Vec::new();
    let mut current: Option<DeletionError> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Error" => {
                    current = Some(DeletionError {
                        key: String::new(),
                        version_id: String::new(),
                        code: String::new(),
                        message: String::new(),
                    });
                }
                b"Key" => {
                    if let Some(error) = current.as_mut() {
                        error.key = read_element_text(&mut reader, &mut text_buf)?;
                    }
                }
                b"VersionId" => {
                    if let Some(error) = current.as_mut() {
                        error.version_id = read_element_text(&mut reader, &mut text_buf)?;
                    }
                }
                b"Code" => {
                    if let Some(error) = current.as_mut() {
                        error.code = read_element_text(&mut reader, &mut text_buf)?;
                    }
                }
                b"Message" => {
                    if let Some(error) = current.as_mut() {
                        error.message = read_element_text(&mut reader, &mut text_buf)?;
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"Error" {
                    if let Some(error) = current.take() {
                        errors.push(error);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(StoreError::Xml(format!(
                    "Failed to parse delete result: {}",
                    e
                )))
            }
            _ => {}
        }

        buf.clear();
    }

    Ok(errors)
}
