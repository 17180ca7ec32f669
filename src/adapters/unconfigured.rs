use crate::adapters::identity::{CallerIdentity, IdentityProbe};
use crate::adapters::records::{RecordStore, TableSummary};
use crate::adapters::storage::{ObjectStorage, PutObject};
use crate::domain::submission::Submission;
use crate::error::{AppError, Result};
use async_trait::async_trait;

/// Stand-in for every store when the AWS clients could not be built.
///
/// Each call fails with a configuration error naming the missing setting, so the
/// server keeps answering and `/aws-config` can still report what is wrong.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    setting: &'static str,
}

impl Unconfigured {
    #[must_use]
    pub const fn new(setting: &'static str) -> Self {
        Self { setting }
    }

    const fn error(self) -> AppError {
        AppError::Configuration { setting: self.setting }
    }
}

#[async_trait]
impl ObjectStorage for Unconfigured {
    fn bucket(&self) -> Result<&str> {
        Err(self.error())
    }

    async fn put(&self, _object: PutObject) -> Result<String> {
        Err(self.error())
    }
}

#[async_trait]
impl RecordStore for Unconfigured {
    fn table_name(&self) -> Result<&str> {
        Err(self.error())
    }

    async fn put(&self, _submission: &Submission) -> Result<()> {
        Err(self.error())
    }

    async fn describe(&self) -> Result<TableSummary> {
        Err(self.error())
    }
}

#[async_trait]
impl IdentityProbe for Unconfigured {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        Err(self.error())
    }
}
