// Infrastructure error types
pub mod error;

// Storage client implementations
pub mod in_memory;
pub mod s3;

// Re-export key types
pub use error::StoreError;
pub use in_memory::InMemoryStorageClient;
pub use s3::S3StorageClient;
