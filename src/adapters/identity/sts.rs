use crate::adapters::identity::{CallerIdentity, IdentityProbe};
use crate::adapters::provider_error::store_error;
use crate::error::Result;
use async_trait::async_trait;
use aws_sdk_sts::Client;
use aws_sdk_sts::error::DisplayErrorContext;

#[derive(Clone, Debug)]
pub struct StsIdentityProbe {
    client: Client,
}

impl StsIdentityProbe {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProbe for StsIdentityProbe {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self.client.get_caller_identity().send().await.map_err(|e| {
            tracing::warn!(error = %DisplayErrorContext(&e), "STS GetCallerIdentity failed");
            store_error(&e, "Caller identity")
        })?;

        Ok(CallerIdentity {
            account: output.account().map(ToString::to_string),
            arn: output.arn().map(ToString::to_string),
            user_id: output.user_id().map(ToString::to_string),
        })
    }
}
