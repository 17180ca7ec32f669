use crate::domain::credentials::CredentialSummary;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("{setting} is not configured")]
    Configuration { setting: &'static str },
    #[error("Attachment upload failed: {0}")]
    Upload(String),
    #[error("Store rejected the credentials: {details}")]
    Authentication { details: String, credentials: Option<Box<CredentialSummary>> },
    #[error("{resource} not found: {details}")]
    NotFound { resource: String, details: String },
    #[error("Store operation failed: {0}")]
    Persistence(String),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Closed set of failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Configuration,
    Upload,
    Authentication,
    NotFound,
    Persistence,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Upload => "upload",
            Self::Authentication => "authentication",
            Self::NotFound => "notFound",
            Self::Persistence => "persistence",
            Self::Internal => "internal",
        }
    }
}

impl AppError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Upload(_) => ErrorKind::Upload,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::Internal => ErrorKind::Internal,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Configuration { .. } | Self::Upload(_) | Self::Persistence(_) | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Attaches the masked credential summary to authentication failures.
    #[must_use]
    pub fn with_credentials(self, summary: &CredentialSummary) -> Self {
        match self {
            Self::Authentication { details, .. } => {
                Self::Authentication { details, credentials: Some(Box::new(summary.clone())) }
            }
            other => other,
        }
    }

    fn title(&self) -> String {
        match self {
            Self::Validation(_) => "Missing required fields".into(),
            Self::Configuration { setting } => format!("{setting} not configured"),
            Self::Upload(_) => "Failed to upload file".into(),
            Self::Authentication { .. } => "AWS Authentication Error".into(),
            Self::NotFound { resource, .. } => format!("{resource} not found"),
            Self::Persistence(_) => "Failed to store submission".into(),
            Self::Internal => "Internal server error".into(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Validation(details)
            | Self::Upload(details)
            | Self::Persistence(details)
            | Self::Authentication { details, .. }
            | Self::NotFound { details, .. } => Some(details.clone()),
            Self::Configuration { setting } => Some(format!("Set {setting} for this deployment")),
            Self::Internal => None,
        }
    }

    /// Remediation steps shown to the operator, keyed by failure kind.
    #[must_use]
    pub fn troubleshooting(&self) -> Vec<String> {
        let lines: &[&str] = match self {
            Self::Validation(_) => &["Name, email, and message are required"],
            Self::Configuration { .. } => &[
                "This setting must be provided through the environment or command line",
                "Restart the service after changing its configuration",
            ],
            Self::Upload(_) => &[
                "1. Verify the S3 bucket exists in the configured region",
                "2. Check that the credentials allow s3:PutObject on the bucket",
                "3. Confirm the attachment is within the size limit",
            ],
            Self::Authentication { .. } => &[
                "1. AWS_ACCESS_KEY_ID is incorrect - Please double-check the value",
                "2. AWS_SECRET_ACCESS_KEY is incorrect - Please verify there are no typos",
                "3. The credentials have extra spaces/newlines - Re-enter them carefully",
                "4. AWS_REGION does not match your table location - Check your DynamoDB console",
                "5. The IAM user associated with these credentials may not have the necessary permissions",
            ],
            Self::NotFound { .. } => &[
                "1. Verify the table name is correct",
                "2. Check that the table is in the correct AWS region",
                "3. Ensure the table has been created in your AWS account",
            ],
            Self::Persistence(_) => &[
                "1. Check the server logs for more details",
                "2. Ensure the IAM policy allows dynamodb:PutItem and dynamodb:DescribeTable",
            ],
            Self::Internal => &[],
        };
        lines.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub troubleshooting: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_config: Option<CredentialSummary>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        let current_config = match err {
            AppError::Authentication { credentials, .. } => credentials.as_deref().cloned(),
            _ => None,
        };
        Self {
            success: false,
            error: err.title(),
            kind: err.kind(),
            details: err.details(),
            troubleshooting: err.troubleshooting(),
            current_config,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Validation(msg) => tracing::debug!(message = %msg, "Rejected submission"),
            Self::Configuration { setting } => tracing::error!(setting = %setting, "Missing configuration"),
            Self::Authentication { details, .. } => tracing::error!(error = %details, "Store authentication failed"),
            Self::NotFound { resource, details } => tracing::warn!(resource = %resource, error = %details, "Store resource missing"),
            Self::Upload(e) => tracing::error!(error = %e, "Attachment upload failed"),
            Self::Persistence(e) => tracing::error!(error = %e, "Store write failed"),
            Self::Internal => tracing::error!("Internal server error occurred"),
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
