use std::time::Duration;

use anyhow::Result as AnyhowResult;
use reqwest::Client;
use tracing::debug;

use crate::domain::{
    upn::{IdentityDriven, UpstreamResponse},
    Result,
};

/// Query parameter carrying the account id, encoded by reqwest.
const ACCOUNT_ID_PARAM: &str = "accountId";

pub struct JiraDrivenImpl {
    client: Client,
    url: String,
    account: String,
    api_key: String,
}
impl JiraDrivenImpl {
    pub fn try_new(
        url: &str,
        account: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> AnyhowResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let url = url.to_string();
        let account = account.to_string();
        let api_key = api_key.to_string();

        Ok(Self {
            client,
            url,
            account,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl IdentityDriven for JiraDrivenImpl {
    async fn find_user(&self, account_id: &str) -> Result<UpstreamResponse> {
        let response = self
            .client
            .get(&self.url)
            .query(&[(ACCOUNT_ID_PARAM, account_id)])
            .basic_auth(&self.account, Some(&self.api_key))
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.to_string(), "jira user lookup response");

        let body = response.bytes().await?.to_vec();

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}
