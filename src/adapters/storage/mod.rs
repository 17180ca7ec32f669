use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

pub mod s3;

pub use s3::S3Storage;

/// An object to be written in a single request.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub metadata: Vec<(String, String)>,
}

#[async_trait]
pub trait ObjectStorage: Debug + Send + Sync + 'static {
    /// Target bucket, or a configuration error when none is set.
    ///
    /// # Errors
    /// Returns `AppError::Configuration` if no bucket is configured.
    fn bucket(&self) -> Result<&str>;

    /// Stores the object and returns a durable reference to it.
    ///
    /// # Errors
    /// Returns `AppError::Upload` if the store rejects or fails the write.
    async fn put(&self, object: PutObject) -> Result<String>;
}
