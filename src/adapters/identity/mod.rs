use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

pub mod sts;

pub use sts::StsIdentityProbe;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

/// Reports who the configured credentials belong to. Diagnostics only.
#[async_trait]
pub trait IdentityProbe: Debug + Send + Sync + 'static {
    /// # Errors
    /// Returns `AppError::Authentication` when the credentials are rejected.
    async fn caller_identity(&self) -> Result<CallerIdentity>;
}
