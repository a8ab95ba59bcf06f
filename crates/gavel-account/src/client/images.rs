//! Image store client for media application evidence

use gavel_common::error::GavelError;
use gavel_common::traits::ImageStore;

pub struct ImageStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl ImageStoreClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ImageStore for ImageStoreClient {
    async fn delete_image(&self, image_ref: &str) -> anyhow::Result<()> {
        let url = format!("{}/images/{}", self.base_url, image_ref);
        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(GavelError::InternalError(format!(
                "image store returned status {} deleting '{}'",
                response.status(),
                image_ref
            ))
            .into());
        }

        Ok(())
    }
}
