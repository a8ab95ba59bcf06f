//! Collaborator traits for dependency injection
//!
//! These traits abstract the external services the account backend talks
//! to, allowing services to depend only on the contracts they need and
//! tests to substitute fakes.

/// Account fields pushed to the identity directory on creation
#[derive(Debug, Clone, Default)]
pub struct DirectoryUser {
    pub email: String,
    pub first_name: String,
    pub surname: String,
    /// Role name as known to the directory
    pub role: String,
}

/// Record returned by a directory lookup
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub external_id: String,
    pub email: String,
}

/// Identity directory service (Azure-AD-style user provisioning)
///
/// Creation failure aborts the affected record only; all other calls are
/// best-effort from the caller's point of view, the local account row is
/// the source of truth.
#[async_trait::async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Provision a directory entry, returning its external id
    async fn create_user(&self, user: &DirectoryUser) -> anyhow::Result<String>;

    /// Look up an existing entry by email
    async fn get_user(&self, email: &str) -> anyhow::Result<Option<DirectoryRecord>>;

    /// Remove a directory entry
    async fn delete_user(&self, external_id: &str) -> anyhow::Result<()>;

    /// Push a role change to the directory
    async fn update_user_role(&self, external_id: &str, role: &str) -> anyhow::Result<()>;
}

/// Notification dispatcher (delegates to the publication microservice)
#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Welcome / account-created email
    async fn send_welcome(&self, email: &str, full_name: &str) -> anyhow::Result<String>;

    /// Inactivity notice asking the user to re-verify or sign in
    async fn send_inactivity_notice(
        &self,
        email: &str,
        full_name: &str,
        last_active: &str,
    ) -> anyhow::Result<String>;

    /// Media accreditation decision email
    async fn send_media_application_update(
        &self,
        email: &str,
        full_name: &str,
        approved: bool,
        reasons: &str,
    ) -> anyhow::Result<String>;
}

/// Subscription cleanup service
#[async_trait::async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Delete all subscriptions held by a user, returning a log message
    async fn delete_all_for_user(&self, user_id: &str) -> anyhow::Result<String>;
}

/// Image store holding media application evidence
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    async fn delete_image(&self, image_ref: &str) -> anyhow::Result<()>;
}
