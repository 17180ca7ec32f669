use crate::adapters::provider_error::describe;
use crate::adapters::storage::{ObjectStorage, PutObject};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

pub(crate) const BUCKET_SETTING: &str = "AWS_S3_BUCKET_NAME";

#[derive(Clone, Debug)]
pub struct S3Storage {
    client: Client,
    bucket: Option<String>,
    region: String,
    endpoint: Option<String>,
}

impl S3Storage {
    #[must_use]
    pub const fn new(client: Client, bucket: Option<String>, region: String, endpoint: Option<String>) -> Self {
        Self { client, bucket, region, endpoint }
    }

    /// Public URL of an object: path style under a custom endpoint, virtual-hosted otherwise.
    #[must_use]
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
            None => format!("https://{bucket}.s3.{}.amazonaws.com/{key}", self.region),
        }
    }
}

// S3 user metadata travels as HTTP headers and must stay ASCII.
fn header_safe(value: &str) -> String {
    value.chars().map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' }).collect()
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn bucket(&self) -> Result<&str> {
        self.bucket.as_deref().ok_or(AppError::Configuration { setting: BUCKET_SETTING })
    }

    async fn put(&self, object: PutObject) -> Result<String> {
        let bucket = self.bucket()?;
        let PutObject { key, body, content_type, metadata } = object;
        let content_length = i64::try_from(body.len()).unwrap_or(i64::MAX);

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .content_length(content_length)
            .set_content_type(content_type)
            .body(ByteStream::from(body));

        for (name, value) in metadata {
            request = request.metadata(name, header_safe(&value));
        }

        request.send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), key = %key, "S3 upload failed");
            AppError::Upload(describe(&e))
        })?;

        Ok(self.object_url(bucket, &key))
    }
}
