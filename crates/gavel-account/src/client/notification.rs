//! Notification client
//!
//! Delegates email delivery to the publication microservice. Lifecycle
//! callers treat every send as fire-and-forget.

use gavel_common::error::GavelError;
use gavel_common::traits::NotificationDispatcher;

pub struct NotificationClient {
    client: reqwest::Client,
    base_url: String,
}

impl NotificationClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_email(&self, path: &str, body: serde_json::Value) -> anyhow::Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(GavelError::NotificationError(format!(
                "publication service returned status {} for {}",
                response.status(),
                path
            ))
            .into());
        }

        Ok(response.text().await.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for NotificationClient {
    async fn send_welcome(&self, email: &str, full_name: &str) -> anyhow::Result<String> {
        self.post_email(
            "/notify/welcome",
            serde_json::json!({ "email": email, "fullName": full_name }),
        )
        .await
    }

    async fn send_inactivity_notice(
        &self,
        email: &str,
        full_name: &str,
        last_active: &str,
    ) -> anyhow::Result<String> {
        self.post_email(
            "/notify/inactivity",
            serde_json::json!({
                "email": email,
                "fullName": full_name,
                "lastActive": last_active,
            }),
        )
        .await
    }

    async fn send_media_application_update(
        &self,
        email: &str,
        full_name: &str,
        approved: bool,
        reasons: &str,
    ) -> anyhow::Result<String> {
        self.post_email(
            "/notify/media-application",
            serde_json::json!({
                "email": email,
                "fullName": full_name,
                "approved": approved,
                "reasons": reasons,
            }),
        )
        .await
    }
}
