use clap::{Args, Parser, ValueEnum};
use std::fmt;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub aws: AwsConfig,

    #[command(flatten)]
    pub submissions: SubmissionConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "CONTACT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CONTACT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Upper bound for a single request, including the store calls
    #[arg(long, env = "CONTACT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight requests on shutdown
    #[arg(long, env = "CONTACT_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

/// Deployment settings for the AWS collaborators.
///
/// Every field is optional at startup. Operations that need a value fail with a
/// configuration error when it is missing.
#[derive(Clone, Args)]
pub struct AwsConfig {
    /// AWS region of the bucket and table
    #[arg(long = "aws-region", env = "AWS_REGION")]
    pub region: Option<String>,

    /// Static access key id
    #[arg(long = "aws-access-key-id", env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[arg(long = "aws-secret-access-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Bucket that receives contact form attachments
    #[arg(long = "s3-bucket", env = "AWS_S3_BUCKET_NAME")]
    pub bucket_name: Option<String>,

    /// Table that receives contact form submissions
    #[arg(long = "dynamodb-table", env = "AWS_DYNAMODB_TABLE_NAME")]
    pub table_name: Option<String>,

    /// Partition key attribute of the submissions table
    #[arg(long, env = "AWS_DYNAMODB_PARTITION_KEY", default_value = "userId")]
    pub partition_key: String,

    /// Custom endpoint for all AWS services (LocalStack, MinIO)
    #[arg(long = "aws-endpoint-url", env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Force path style S3 addressing (required by most MinIO setups)
    #[arg(long, env = "AWS_S3_FORCE_PATH_STYLE", default_value_t = false)]
    pub force_path_style: bool,
}

pub const DEFAULT_REGION: &str = "us-east-1";

fn trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl AwsConfig {
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        trimmed(self.region.as_ref())
    }

    /// Region used to build clients; falls back to `us-east-1`.
    #[must_use]
    pub fn effective_region(&self) -> &str {
        self.region().unwrap_or(DEFAULT_REGION)
    }

    #[must_use]
    pub fn access_key_id(&self) -> Option<&str> {
        trimmed(self.access_key_id.as_ref())
    }

    #[must_use]
    pub fn secret_access_key(&self) -> Option<&str> {
        trimmed(self.secret_access_key.as_ref())
    }

    /// The secret exactly as it was supplied, used only to spot stray whitespace.
    #[must_use]
    pub fn raw_secret_access_key(&self) -> Option<&str> {
        self.secret_access_key.as_deref()
    }

    #[must_use]
    pub fn bucket_name(&self) -> Option<&str> {
        trimmed(self.bucket_name.as_ref())
    }

    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        trimmed(self.table_name.as_ref())
    }

    #[must_use]
    pub fn endpoint_url(&self) -> Option<&str> {
        trimmed(self.endpoint_url.as_ref())
    }
}

impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id().map(crate::domain::credentials::mask_access_key))
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("bucket_name", &self.bucket_name)
            .field("table_name", &self.table_name)
            .field("partition_key", &self.partition_key)
            .field("endpoint_url", &self.endpoint_url)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

#[derive(Clone, Debug, Args)]
pub struct SubmissionConfig {
    /// Max attachment size in bytes (Default: 10MB)
    #[arg(long, env = "CONTACT_MAX_ATTACHMENT_BYTES", default_value_t = 10_485_760)]
    pub max_attachment_bytes: usize,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for the write endpoints, per client IP
    #[arg(long, env = "CONTACT_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub per_second: u32,

    /// Burst allowance for the write endpoints
    #[arg(long, env = "CONTACT_RATE_LIMIT_BURST", default_value_t = 5)]
    pub burst: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint; tracing and metrics export is disabled when unset
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
