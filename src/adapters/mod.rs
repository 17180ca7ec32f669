use crate::config::AwsConfig;
use crate::domain::credentials::CredentialSummary;
use crate::error::{AppError, Result};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use std::sync::Arc;

pub mod identity;
pub(crate) mod provider_error;
pub mod records;
pub mod storage;
pub mod unconfigured;

use identity::{IdentityProbe, StsIdentityProbe};
use records::{DynamoRecordStore, RecordStore};
use storage::{ObjectStorage, S3Storage};
use unconfigured::Unconfigured;

/// Store handles shared by the submission pipeline and the diagnostics endpoint.
#[derive(Clone, Debug)]
pub struct Clients {
    pub objects: Arc<dyn ObjectStorage>,
    pub records: Arc<dyn RecordStore>,
    pub identity: Arc<dyn IdentityProbe>,
    /// Masked description of the credentials behind these handles.
    pub credentials: CredentialSummary,
}

impl Clients {
    #[must_use]
    pub fn new(
        objects: Arc<dyn ObjectStorage>,
        records: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProbe>,
        credentials: CredentialSummary,
    ) -> Self {
        Self { objects, records, identity, credentials }
    }

    /// Bundle whose store calls all fail with `AppError::Configuration { setting }`.
    #[must_use]
    pub fn unconfigured(config: &AwsConfig, setting: &'static str) -> Self {
        let stub = Arc::new(Unconfigured::new(setting));
        Self::new(
            Arc::<Unconfigured>::clone(&stub),
            Arc::<Unconfigured>::clone(&stub),
            stub,
            summary(config),
        )
    }

    /// Builds the AWS-backed clients, or an unconfigured bundle when that fails.
    ///
    /// A broken credential setup degrades the store operations instead of stopping
    /// the process, so the diagnostics endpoints stay reachable.
    pub async fn connect(config: &AwsConfig) -> Self {
        match Self::from_config(config).await {
            Ok(clients) => clients,
            Err(AppError::Configuration { setting }) => {
                tracing::error!(setting, "AWS clients unavailable, store operations will fail until this is set");
                Self::unconfigured(config, setting)
            }
            Err(e) => {
                tracing::error!(error = %e, "AWS clients unavailable");
                Self::unconfigured(config, "AWS credentials")
            }
        }
    }

    /// Builds the AWS-backed clients.
    ///
    /// Static credentials are used when both halves of the pair are configured; with
    /// neither, the SDK default provider chain applies.
    ///
    /// # Errors
    /// Returns `AppError::Configuration` if only one half of the credential pair is set.
    pub async fn from_config(config: &AwsConfig) -> Result<Self> {
        let region = config.effective_region().to_string();
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));

        match (config.access_key_id(), config.secret_access_key()) {
            (Some(access_key_id), Some(secret)) => {
                tracing::info!(
                    region = %region,
                    access_key_id = %crate::domain::credentials::mask_access_key(access_key_id),
                    "Using static AWS credentials"
                );
                loader = loader.credentials_provider(Credentials::new(access_key_id, secret, None, None, "static"));
            }
            (Some(_), None) => return Err(AppError::Configuration { setting: "AWS_SECRET_ACCESS_KEY" }),
            (None, Some(_)) => return Err(AppError::Configuration { setting: "AWS_ACCESS_KEY_ID" }),
            (None, None) => {
                tracing::info!(region = %region, "No static AWS credentials configured, using the default provider chain");
            }
        }

        if let Some(endpoint) = config.endpoint_url() {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.force_path_style).build();
        let objects = S3Storage::new(
            aws_sdk_s3::Client::from_conf(s3_config),
            config.bucket_name().map(ToString::to_string),
            region,
            config.endpoint_url().map(ToString::to_string),
        );

        let records = DynamoRecordStore::new(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            config.table_name().map(ToString::to_string),
            config.partition_key.clone(),
        );

        let identity = StsIdentityProbe::new(aws_sdk_sts::Client::new(&sdk_config));

        Ok(Self::new(Arc::new(objects), Arc::new(records), Arc::new(identity), summary(config)))
    }
}

fn summary(config: &AwsConfig) -> CredentialSummary {
    CredentialSummary::new(
        config.effective_region(),
        config.access_key_id(),
        config.secret_access_key(),
        config.table_name(),
    )
}
