mod deletion;
mod listing;

pub use deletion::{DeletionBatch, DeletionError, MAX_DELETE_BATCH};
pub use listing::{ListedVersion, ObjectVersionPage, PaginationCursor, VersionedObjectRef};
