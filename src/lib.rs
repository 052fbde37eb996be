pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core entities and value objects
pub use domain::{
    // Value objects
    BucketName,
    // Errors
    ClientError,
    ClientResult,
    // Models
    DeletionBatch,
    DeletionError,
    DomainValidationError,
    ListedVersion,
    ObjectVersionPage,
    PaginationCursor,
    VersionedObjectRef,
    MAX_DELETE_BATCH,
};

// Port types - interfaces for external systems
pub use ports::{ObjectStorageClient, TeardownService};

// Service implementations
pub use services::TeardownServiceImpl;

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{InMemoryStorageClient, S3StorageClient};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        BucketName, ClientError, ClientResult, DeletionError, InMemoryStorageClient,
        ObjectStorageClient, S3StorageClient, TeardownService, TeardownServiceImpl,
    };
}
