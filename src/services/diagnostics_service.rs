use crate::adapters::Clients;
use crate::adapters::identity::CallerIdentity;
use crate::adapters::records::TableSummary;
use crate::config::AwsConfig;
use crate::domain::credentials::{
    access_key_id_warnings, has_valid_prefix, mask_access_key, mask_secret, secret_access_key_warnings,
};
use crate::domain::submission::{Submission, new_test_id};
use crate::error::{AppError, ErrorKind, Result};
use serde::Serialize;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::timeout;

const NOT_SET: &str = "not set";
const IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

/// The diagnostic checks exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Config,
    ReadProbe,
    WriteProbe,
    Health,
}

impl Probe {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Config => "/aws-config",
            Self::ReadProbe => "/test-dynamodb",
            Self::WriteProbe => "/test-write",
            Self::Health => "/health",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredFlags {
    pub access_key_id: bool,
    pub secret_access_key: bool,
    pub region: bool,
    pub bucket_name: bool,
    pub table_name: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedValues {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket_name: String,
    pub table_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDebug {
    pub access_key_id_length: usize,
    pub secret_access_key_length: usize,
    pub access_key_id_format: &'static str,
}

/// Why the caller identity could not be resolved, with remediation hints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityError {
    pub kind: ErrorKind,
    pub message: String,
    pub troubleshooting: Vec<String>,
}

impl From<&AppError> for IdentityError {
    fn from(err: &AppError) -> Self {
        Self { kind: err.kind(), message: err.to_string(), troubleshooting: err.troubleshooting() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub configured: ConfiguredFlags,
    pub values: MaskedValues,
    pub debug: CredentialDebug,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<CallerIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_error: Option<IdentityError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadProbeReport {
    pub success: bool,
    pub message: &'static str,
    pub user: String,
    pub table: TableSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteProbeReport {
    pub success: bool,
    pub message: &'static str,
    pub test_id: String,
    pub table_name: String,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProbeReport {
    Config(ConfigReport),
    Read(ReadProbeReport),
    Write(WriteProbeReport),
    Health(HealthReport),
}

/// Answers "is this deployment configured correctly". Only the write probe mutates state.
#[derive(Clone, Debug)]
pub struct DiagnosticsService {
    clients: Clients,
    aws: AwsConfig,
}

impl DiagnosticsService {
    #[must_use]
    pub const fn new(clients: Clients, aws: AwsConfig) -> Self {
        Self { clients, aws }
    }

    /// Runs a single probe.
    ///
    /// # Errors
    /// Store failures from the read and write probes, classified like submission failures.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn run(&self, probe: Probe) -> Result<ProbeReport> {
        let report = match probe {
            Probe::Config => ProbeReport::Config(self.config_report().await),
            Probe::ReadProbe => ProbeReport::Read(self.read_probe().await?),
            Probe::WriteProbe => ProbeReport::Write(self.write_probe().await?),
            Probe::Health => ProbeReport::Health(HealthReport { status: "ok" }),
        };
        Ok(report)
    }

    async fn config_report(&self) -> ConfigReport {
        let access_key_id = self.aws.access_key_id();
        let secret = self.aws.secret_access_key();

        let mut warnings = Vec::new();
        if let Some(key) = access_key_id {
            warnings.extend(access_key_id_warnings(key));
        }
        if let Some(raw) = self.aws.raw_secret_access_key().filter(|_| secret.is_some()) {
            warnings.extend(secret_access_key_warnings(raw));
        }

        let mut identity_error = None;
        let identity = match timeout(IDENTITY_TIMEOUT, self.clients.identity.caller_identity()).await {
            Ok(Ok(identity)) => Some(identity),
            Ok(Err(e)) => {
                warnings.push(format!("Caller identity unavailable ({}): {e}", e.kind().as_str()));
                identity_error = Some(IdentityError::from(&e));
                None
            }
            Err(_) => {
                warnings.push("Caller identity lookup timed out".to_string());
                None
            }
        };

        ConfigReport {
            configured: ConfiguredFlags {
                access_key_id: access_key_id.is_some(),
                secret_access_key: secret.is_some(),
                region: self.aws.region().is_some(),
                bucket_name: self.aws.bucket_name().is_some(),
                table_name: self.aws.table_name().is_some(),
            },
            values: MaskedValues {
                access_key_id: access_key_id.map_or_else(|| NOT_SET.to_string(), mask_access_key),
                secret_access_key: secret.map_or_else(|| NOT_SET.to_string(), mask_secret),
                region: self.aws.region().unwrap_or(NOT_SET).to_string(),
                bucket_name: self.aws.bucket_name().unwrap_or(NOT_SET).to_string(),
                table_name: self.aws.table_name().unwrap_or(NOT_SET).to_string(),
            },
            debug: CredentialDebug {
                access_key_id_length: access_key_id.map_or(0, |k| k.chars().count()),
                secret_access_key_length: secret.map_or(0, |s| s.chars().count()),
                access_key_id_format: match access_key_id {
                    Some(k) if has_valid_prefix(k) => "valid",
                    Some(_) => "invalid",
                    None => NOT_SET,
                },
            },
            identity,
            identity_error,
            warnings,
        }
    }

    async fn read_probe(&self) -> Result<ReadProbeReport> {
        let table = self.clients.records.describe().await.map_err(|e| self.annotate(e))?;
        let identity = self.clients.identity.caller_identity().await.map_err(|e| self.annotate(e))?;

        tracing::info!(table = %table.name, status = %table.status, "DynamoDB read probe succeeded");

        Ok(ReadProbeReport {
            success: true,
            message: "Successfully connected to DynamoDB",
            user: identity.arn.unwrap_or_else(|| "unknown".to_string()),
            table,
        })
    }

    async fn write_probe(&self) -> Result<WriteProbeReport> {
        let table_name = self.clients.records.table_name()?.to_string();
        let record = Submission::diagnostic(new_test_id(), OffsetDateTime::now_utc());

        self.clients.records.put(&record).await.map_err(|e| self.annotate(e))?;

        tracing::info!(table = %table_name, test_id = %record.id, "DynamoDB write probe succeeded");

        Ok(WriteProbeReport {
            success: true,
            message: "Test item written successfully to DynamoDB",
            test_id: record.id,
            table_name,
        })
    }

    fn annotate(&self, err: AppError) -> AppError {
        err.with_credentials(&self.clients.credentials)
    }
}
