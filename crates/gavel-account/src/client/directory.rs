//! Identity directory client
//!
//! Talks to the external directory service that provisions login
//! identities for directory-backed accounts.

use gavel_common::error::GavelError;
use gavel_common::traits::{DirectoryRecord, DirectoryUser, IdentityDirectory};
use serde::Deserialize;

pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryUserResponse {
    id: String,
    email: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IdentityDirectory for DirectoryClient {
    async fn create_user(&self, user: &DirectoryUser) -> anyhow::Result<String> {
        let url = format!("{}/users", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": user.email,
                "firstName": user.first_name,
                "surname": user.surname,
                "role": user.role,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GavelError::DirectoryError(format!(
                "directory returned status {} creating '{}'",
                response.status(),
                user.email
            ))
            .into());
        }

        let created: DirectoryUserResponse = response.json().await?;
        Ok(created.id)
    }

    async fn get_user(&self, email: &str) -> anyhow::Result<Option<DirectoryRecord>> {
        let url = format!("{}/users", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("email", email)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GavelError::DirectoryError(format!(
                "directory returned status {} looking up '{}'",
                response.status(),
                email
            ))
            .into());
        }

        let record: DirectoryUserResponse = response.json().await?;
        Ok(Some(DirectoryRecord {
            external_id: record.id,
            email: record.email,
        }))
    }

    async fn delete_user(&self, external_id: &str) -> anyhow::Result<()> {
        let url = format!("{}/users/{}", self.base_url, external_id);
        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(GavelError::DirectoryError(format!(
                "directory returned status {} deleting '{}'",
                response.status(),
                external_id
            ))
            .into());
        }

        Ok(())
    }

    async fn update_user_role(&self, external_id: &str, role: &str) -> anyhow::Result<()> {
        let url = format!("{}/users/{}/role", self.base_url, external_id);
        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GavelError::DirectoryError(format!(
                "directory returned status {} updating role of '{}'",
                response.status(),
                external_id
            ))
            .into());
        }

        Ok(())
    }
}
