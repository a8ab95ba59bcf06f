//! Reqwest-backed clients for the external collaborators

pub mod directory;
pub mod images;
pub mod notification;
pub mod subscription;

pub use directory::DirectoryClient;
pub use images::ImageStoreClient;
pub use notification::NotificationClient;
pub use subscription::SubscriptionClient;

use std::time::Duration;

/// Default timeout applied to every outbound collaborator call
pub(crate) const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(CLIENT_TIMEOUT)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))
}
