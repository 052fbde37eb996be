/// Resume point for a paginated version listing.
///
/// Produced from each listing response and fed into the next request.
/// The initial cursor has both markers absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
}

impl PaginationCursor {
    pub fn is_initial(&self) -> bool {
        self.key_marker.is_none() && self.version_id_marker.is_none()
    }
}

/// One entry of a version listing, as reported by the provider.
///
/// Object versions and delete markers share this shape; either field may be
/// absent in a provider response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedVersion {
    pub key: Option<String>,
    pub version_id: Option<String>,
}

impl ListedVersion {
    pub fn new(key: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            version_id: Some(version_id.into()),
        }
    }
}

/// Identifies a single deletable unit: one object version or delete marker.
///
/// Absent listing fields are substituted with empty strings at construction,
/// never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedObjectRef {
    pub key: String,
    pub version_id: String,
}

impl From<&ListedVersion> for VersionedObjectRef {
    fn from(entry: &ListedVersion) -> Self {
        Self {
            key: entry.key.clone().unwrap_or_default(),
            version_id: entry.version_id.clone().unwrap_or_default(),
        }
    }
}

/// One page of a version listing response.
///
/// Optional response fields are defaulted where the page is built: a missing
/// truncation flag means false, missing markers stay absent.
#[derive(Debug, Clone, Default)]
pub struct ObjectVersionPage {
    pub is_truncated: bool,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
    pub versions: Vec<ListedVersion>,
    pub delete_markers: Vec<ListedVersion>,
}

impl ObjectVersionPage {
    /// Cursor for the request that follows this page.
    pub fn next_cursor(&self) -> PaginationCursor {
        PaginationCursor {
            key_marker: self.next_key_marker.clone(),
            version_id_marker: self.next_version_id_marker.clone(),
        }
    }

    /// All deletable entries of this page, versions first, then delete
    /// markers. The order is deterministic.
    pub fn deletable(&self) -> impl Iterator<Item = &ListedVersion> {
        self.versions.iter().chain(self.delete_markers.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.delete_markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_cursor_has_no_markers() {
        let cursor = PaginationCursor::default();
        assert!(cursor.is_initial());
    }

    #[test]
    fn next_cursor_carries_response_markers() {
        let page = ObjectVersionPage {
            is_truncated: true,
            next_key_marker: Some("logs/0042".to_string()),
            next_version_id_marker: Some("v-17".to_string()),
            ..Default::default()
        };

        let cursor = page.next_cursor();
        assert_eq!(cursor.key_marker.as_deref(), Some("logs/0042"));
        assert_eq!(cursor.version_id_marker.as_deref(), Some("v-17"));
    }

    #[test]
    fn deletable_lists_versions_before_markers() {
        let page = ObjectVersionPage {
            versions: vec![ListedVersion::new("a", "1")],
            delete_markers: vec![ListedVersion::new("a", "2")],
            ..Default::default()
        };

        let order: Vec<_> = page
            .deletable()
            .map(|e| e.version_id.clone().unwrap())
            .collect();
        assert_eq!(order, vec!["1", "2"]);
    }

    #[test]
    fn absent_fields_become_empty_strings() {
        let entry = ListedVersion {
            key: None,
            version_id: None,
        };

        let reference = VersionedObjectRef::from(&entry);
        assert_eq!(reference.key, "");
        assert_eq!(reference.version_id, "");
    }
}
