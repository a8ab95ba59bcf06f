//! Subscription cleanup client

use gavel_common::error::GavelError;
use gavel_common::traits::SubscriptionService;

pub struct SubscriptionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SubscriptionClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl SubscriptionService for SubscriptionClient {
    async fn delete_all_for_user(&self, user_id: &str) -> anyhow::Result<String> {
        let url = format!("{}/subscription/user/{}", self.base_url, user_id);
        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(GavelError::InternalError(format!(
                "subscription service returned status {} for user '{}'",
                response.status(),
                user_id
            ))
            .into());
        }

        Ok(response.text().await.unwrap_or_default())
    }
}
