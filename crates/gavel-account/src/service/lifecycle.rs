//! Inactivity lifecycle engine
//!
//! Scheduled evaluation of accounts against per-category inactivity
//! thresholds. The decision (`evaluate`) is pure and separated from the
//! side-effecting executor (`run_pass`) so the rules can be tested with
//! a fixed clock. There is no persisted "notified" flag: the notify
//! threshold sitting below the delete threshold guarantees the ordering
//! structurally.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gavel_auth::model::INTERNAL_ADMIN_ROLES;
use gavel_common::traits::{IdentityDirectory, NotificationDispatcher, SubscriptionService};
use gavel_persistence::entity::accounts;
use gavel_persistence::sea_orm::*;
use gavel_persistence::{AuditAction, Provenance, Role};
use tracing::{error, info, warn};

use crate::model::LifecycleThresholds;
use crate::service::audit;

/// Inactivity category an account falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Verified media, clocked on last verification
    Media,
    /// Internal SSO admins, clocked on last sign-in
    SsoAdmin,
    /// Directory-backed admins, clocked on last sign-in
    AadAdmin,
}

/// Action the engine decided for one account
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    Notify(accounts::Model, Category),
    Delete(accounts::Model),
}

/// Which inactivity profile applies, if any
///
/// Third-party accounts have no inactivity lifecycle.
pub fn categorise(account: &accounts::Model) -> Option<Category> {
    if account.role == Role::Verified {
        return Some(Category::Media);
    }
    if account.role == Role::SystemAdmin || INTERNAL_ADMIN_ROLES.contains(&account.role) {
        return match account.provenance {
            Provenance::Sso => Some(Category::SsoAdmin),
            Provenance::Aad => Some(Category::AadAdmin),
            _ => None,
        };
    }
    None
}

fn reference_timestamp(account: &accounts::Model, category: Category) -> DateTime<Utc> {
    match category {
        Category::Media => account.last_verified_at.unwrap_or(account.created_at),
        Category::SsoAdmin | Category::AadAdmin => {
            account.last_signed_in_at.unwrap_or(account.created_at)
        }
    }
}

/// Pure decision pass over a snapshot of accounts
///
/// An account past its delete threshold gets a single delete action, one
/// past only the notify threshold gets a notify action. Order-independent
/// across categories; idempotent for a fixed `now`.
pub fn evaluate(
    accounts: &[accounts::Model],
    thresholds: &LifecycleThresholds,
    now: DateTime<Utc>,
) -> Vec<LifecycleAction> {
    let mut actions = Vec::new();

    for account in accounts {
        let Some(category) = categorise(account) else {
            continue;
        };

        let (notify_after, delete_after) = match category {
            Category::Media => (thresholds.media_notify(), thresholds.media_delete()),
            Category::SsoAdmin => (thresholds.sso_admin_notify(), thresholds.sso_admin_delete()),
            Category::AadAdmin => (thresholds.aad_admin_notify(), thresholds.aad_admin_delete()),
        };

        let age = now - reference_timestamp(account, category);
        if age >= delete_after {
            actions.push(LifecycleAction::Delete(account.clone()));
        } else if age >= notify_after {
            actions.push(LifecycleAction::Notify(account.clone(), category));
        }
    }

    actions
}

/// Outcome counts for one scheduled pass
#[derive(Debug, Default, Clone, Copy)]
pub struct PassSummary {
    pub notified: u64,
    pub deleted: u64,
}

async fn notify_account(
    notifier: &dyn NotificationDispatcher,
    account: &accounts::Model,
    category: Category,
) -> anyhow::Result<()> {
    let last_active = reference_timestamp(account, category).to_rfc3339();
    notifier
        .send_inactivity_notice(&account.email, &account.full_name(), &last_active)
        .await?;
    Ok(())
}

async fn execute_delete(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    subscriptions: &dyn SubscriptionService,
    account: &accounts::Model,
) -> anyhow::Result<()> {
    if account.provenance.is_directory_backed() {
        if let Err(e) = directory.delete_user(&account.provenance_user_id).await {
            warn!(
                "directory deletion for inactive account '{}' failed, continuing: {}",
                account.id, e
            );
        }
    }

    match subscriptions.delete_all_for_user(&account.id).await {
        Ok(message) => info!("subscription cleanup for '{}': {}", account.id, message),
        Err(e) => warn!("subscription cleanup for '{}' failed: {}", account.id, e),
    }

    // Local record is the source of truth for "deleted"
    accounts::Entity::delete_by_id(&account.id).exec(db).await?;

    // The deletion already happened; a failed audit write must not make
    // the pass report it as failed
    if let Err(e) = audit::record(
        db,
        account,
        AuditAction::InactiveAccountDeleted,
        &format!(
            "account '{}' deleted after exceeding the inactivity threshold",
            account.id
        ),
    )
    .await
    {
        warn!("audit write for inactive account '{}' failed: {}", account.id, e);
    }

    Ok(())
}

/// One evaluate-and-act pass over all accounts
///
/// Per-account failures are logged and never abort the batch.
pub async fn run_pass(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    notifier: &dyn NotificationDispatcher,
    subscriptions: &dyn SubscriptionService,
    thresholds: &LifecycleThresholds,
) -> anyhow::Result<PassSummary> {
    let snapshot = accounts::Entity::find().all(db).await?;
    let actions = evaluate(&snapshot, thresholds, Utc::now());

    let mut summary = PassSummary::default();

    for action in actions {
        match action {
            LifecycleAction::Notify(account, category) => {
                match notify_account(notifier, &account, category).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => warn!("inactivity notice to '{}' failed: {}", account.email, e),
                }
            }
            LifecycleAction::Delete(account) => {
                match execute_delete(db, directory, subscriptions, &account).await {
                    Ok(()) => summary.deleted += 1,
                    Err(e) => warn!("deletion of inactive account '{}' failed: {}", account.id, e),
                }
            }
        }
    }

    Ok(summary)
}

/// Spawn the scheduled lifecycle job
///
/// Runs one pass per interval and purges expired audit entries in the
/// same cadence. A failed pass is logged and retried on the next tick.
pub fn start_lifecycle_task(
    db: DatabaseConnection,
    directory: Arc<dyn IdentityDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
    subscriptions: Arc<dyn SubscriptionService>,
    thresholds: LifecycleThresholds,
    audit_retention_days: i64,
    interval: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match run_pass(
                &db,
                directory.as_ref(),
                notifier.as_ref(),
                subscriptions.as_ref(),
                &thresholds,
            )
            .await
            {
                Ok(summary) => info!(
                    "lifecycle pass complete: {} notified, {} deleted",
                    summary.notified, summary.deleted
                ),
                Err(e) => error!("lifecycle pass failed: {}", e),
            }

            match audit::purge_expired(&db, audit_retention_days).await {
                Ok(0) => {}
                Ok(purged) => info!("purged {} expired audit entries", purged),
                Err(e) => error!("audit purge failed: {}", e),
            }

            tokio::time::sleep(interval).await;
        }
    })
}

#[cfg(test)]
pub mod test_support {
    //! Fake collaborators shared across service tests

    use std::sync::Mutex;

    use gavel_common::traits::{
        DirectoryRecord, DirectoryUser, IdentityDirectory, ImageStore, NotificationDispatcher,
        SubscriptionService,
    };

    #[derive(Default)]
    pub struct FakeDirectory {
        created: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        pub fn created(&self) -> Vec<String> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IdentityDirectory for FakeDirectory {
        async fn create_user(&self, user: &DirectoryUser) -> anyhow::Result<String> {
            self.created.lock().unwrap().push(user.email.clone());
            Ok(format!("ext-{}", user.email))
        }

        async fn get_user(&self, _email: &str) -> anyhow::Result<Option<DirectoryRecord>> {
            Ok(None)
        }

        async fn delete_user(&self, _external_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn update_user_role(&self, _external_id: &str, _role: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Directory whose every call fails, for partial-failure paths
    pub struct FailingDirectory;

    #[async_trait::async_trait]
    impl IdentityDirectory for FailingDirectory {
        async fn create_user(&self, _user: &DirectoryUser) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("directory unavailable"))
        }

        async fn get_user(&self, _email: &str) -> anyhow::Result<Option<DirectoryRecord>> {
            Err(anyhow::anyhow!("directory unavailable"))
        }

        async fn delete_user(&self, _external_id: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("directory unavailable"))
        }

        async fn update_user_role(&self, _external_id: &str, _role: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("directory unavailable"))
        }
    }

    #[derive(Default)]
    pub struct FakeNotifier {
        welcomes: Mutex<u32>,
        inactivity_notices: Mutex<Vec<String>>,
        application_updates: Mutex<u32>,
    }

    impl FakeNotifier {
        pub fn welcomes(&self) -> u32 {
            *self.welcomes.lock().unwrap()
        }

        pub fn inactivity_notices(&self) -> Vec<String> {
            self.inactivity_notices.lock().unwrap().clone()
        }

        pub fn application_updates(&self) -> u32 {
            *self.application_updates.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl NotificationDispatcher for FakeNotifier {
        async fn send_welcome(&self, _email: &str, _full_name: &str) -> anyhow::Result<String> {
            *self.welcomes.lock().unwrap() += 1;
            Ok("sent".to_string())
        }

        async fn send_inactivity_notice(
            &self,
            email: &str,
            _full_name: &str,
            _last_active: &str,
        ) -> anyhow::Result<String> {
            self.inactivity_notices.lock().unwrap().push(email.to_string());
            Ok("sent".to_string())
        }

        async fn send_media_application_update(
            &self,
            _email: &str,
            _full_name: &str,
            _approved: bool,
            _reasons: &str,
        ) -> anyhow::Result<String> {
            *self.application_updates.lock().unwrap() += 1;
            Ok("sent".to_string())
        }
    }

    #[derive(Default)]
    pub struct FakeSubscriptions {
        cleanups: Mutex<Vec<String>>,
    }

    impl FakeSubscriptions {
        pub fn cleanups(&self) -> Vec<String> {
            self.cleanups.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SubscriptionService for FakeSubscriptions {
        async fn delete_all_for_user(&self, user_id: &str) -> anyhow::Result<String> {
            self.cleanups.lock().unwrap().push(user_id.to_string());
            Ok(format!("subscriptions for {} deleted", user_id))
        }
    }

    #[derive(Default)]
    pub struct FakeImageStore {
        deleted: Mutex<Vec<String>>,
    }

    impl FakeImageStore {
        pub fn deleted(&self) -> Vec<String> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ImageStore for FakeImageStore {
        async fn delete_image(&self, image_ref: &str) -> anyhow::Result<()> {
            self.deleted.lock().unwrap().push(image_ref.to_string());
            Ok(())
        }
    }
}
