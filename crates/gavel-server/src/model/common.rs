//! Server configuration and shared application state

use std::sync::Arc;
use std::time::Duration;

use gavel_account::LifecycleThresholds;
use gavel_common::traits::{
    IdentityDirectory, ImageStore, NotificationDispatcher, SubscriptionService,
};
use sea_orm::DatabaseConnection;

/// Typed accessor over the layered configuration sources
#[derive(Clone)]
pub struct Configuration {
    pub config: config::Config,
}

impl Configuration {
    /// Load configuration from `gavel.*` files plus `GAVEL_`-prefixed
    /// environment overrides
    pub fn new() -> Self {
        let config = config::Config::builder()
            .add_source(config::File::with_name("gavel").required(false))
            .add_source(config::Environment::with_prefix("GAVEL").separator("__"))
            .build()
            .unwrap_or_default();

        Self { config }
    }

    pub fn from_config(config: config::Config) -> Self {
        Self { config }
    }

    pub fn server_address(&self) -> String {
        self.config
            .get_string("gavel.server.address")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config.get_int("gavel.server.port").unwrap_or(6899) as u16
    }

    pub fn database_url(&self) -> String {
        self.config
            .get_string("gavel.database.url")
            .unwrap_or_else(|_| "postgres://localhost:5432/gavel".to_string())
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let db = sea_orm::Database::connect(self.database_url()).await?;
        Ok(db)
    }

    pub fn directory_base_url(&self) -> String {
        self.config
            .get_string("gavel.directory.url")
            .unwrap_or_else(|_| "http://localhost:6901".to_string())
    }

    pub fn publication_base_url(&self) -> String {
        self.config
            .get_string("gavel.publication.url")
            .unwrap_or_else(|_| "http://localhost:6902".to_string())
    }

    pub fn subscription_base_url(&self) -> String {
        self.config
            .get_string("gavel.subscription.url")
            .unwrap_or_else(|_| "http://localhost:6903".to_string())
    }

    pub fn image_store_base_url(&self) -> String {
        self.config
            .get_string("gavel.images.url")
            .unwrap_or_else(|_| "http://localhost:6904".to_string())
    }

    pub fn max_system_admins(&self) -> u64 {
        self.config
            .get_int("gavel.account.max-system-admins")
            .unwrap_or(4) as u64
    }

    pub fn audit_retention_days(&self) -> i64 {
        self.config
            .get_int("gavel.audit.retention-days")
            .unwrap_or(90)
    }

    pub fn lifecycle_interval(&self) -> Duration {
        let secs = self
            .config
            .get_int("gavel.lifecycle.interval-seconds")
            .unwrap_or(86_400);
        Duration::from_secs(secs.max(1) as u64)
    }

    pub fn lifecycle_thresholds(&self) -> LifecycleThresholds {
        let defaults = LifecycleThresholds::default();
        LifecycleThresholds {
            media_notify_days: self
                .config
                .get_int("gavel.lifecycle.media-notify-days")
                .unwrap_or(defaults.media_notify_days),
            media_delete_days: self
                .config
                .get_int("gavel.lifecycle.media-delete-days")
                .unwrap_or(defaults.media_delete_days),
            sso_admin_notify_days: self
                .config
                .get_int("gavel.lifecycle.sso-admin-notify-days")
                .unwrap_or(defaults.sso_admin_notify_days),
            sso_admin_delete_days: self
                .config
                .get_int("gavel.lifecycle.sso-admin-delete-days")
                .unwrap_or(defaults.sso_admin_delete_days),
            aad_admin_notify_days: self
                .config
                .get_int("gavel.lifecycle.aad-admin-notify-days")
                .unwrap_or(defaults.aad_admin_notify_days),
            aad_admin_delete_days: self
                .config
                .get_int("gavel.lifecycle.aad-admin-delete-days")
                .unwrap_or(defaults.aad_admin_delete_days),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    directory: Arc<dyn IdentityDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
    subscriptions: Arc<dyn SubscriptionService>,
    images: Arc<dyn ImageStore>,
    configuration: Configuration,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        directory: Arc<dyn IdentityDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
        subscriptions: Arc<dyn SubscriptionService>,
        images: Arc<dyn ImageStore>,
        configuration: Configuration,
    ) -> Self {
        Self {
            db,
            directory,
            notifier,
            subscriptions,
            images,
            configuration,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn directory(&self) -> &dyn IdentityDirectory {
        self.directory.as_ref()
    }

    pub fn notifier(&self) -> &dyn NotificationDispatcher {
        self.notifier.as_ref()
    }

    pub fn subscriptions(&self) -> &dyn SubscriptionService {
        self.subscriptions.as_ref()
    }

    pub fn images(&self) -> &dyn ImageStore {
        self.images.as_ref()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}
