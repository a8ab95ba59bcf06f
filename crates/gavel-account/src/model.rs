//! Service-layer models

use chrono::Duration;
use gavel_persistence::{Provenance, Role};
use serde::{Deserialize, Serialize};

/// A candidate account in a batch-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    pub role: Role,
    pub provenance: Provenance,
    pub provenance_user_id: String,
}

/// A candidate that failed validation or provisioning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroredAccount {
    pub email: String,
    pub message: String,
}

/// Outcome of a batch creation: partial success by contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationReport {
    /// Ids of the accounts that were created
    pub created: Vec<String>,
    /// Candidates that were rejected, with per-record messages
    pub errored: Vec<ErroredAccount>,
}

impl CreationReport {
    pub fn record_created(&mut self, id: String) {
        self.created.push(id);
    }

    pub fn record_error(&mut self, email: &str, message: impl Into<String>) {
        self.errored.push(ErroredAccount {
            email: email.to_string(),
            message: message.into(),
        });
    }
}

/// Filter for paged account searches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    /// Case-sensitive email prefix
    #[serde(default)]
    pub email_prefix: Option<String>,
    /// Restrict to these roles; empty means the non-third-party default
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub provenances: Vec<Provenance>,
}

/// Per-category inactivity thresholds, in days
///
/// Notify thresholds must sit below the matching delete thresholds; an
/// account only ever crosses notify before delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleThresholds {
    /// Media accounts, measured against last verification
    pub media_notify_days: i64,
    pub media_delete_days: i64,
    /// Internal SSO admins, measured against last sign-in
    pub sso_admin_notify_days: i64,
    pub sso_admin_delete_days: i64,
    /// Directory-backed admins, measured against last sign-in
    pub aad_admin_notify_days: i64,
    pub aad_admin_delete_days: i64,
}

impl Default for LifecycleThresholds {
    fn default() -> Self {
        Self {
            media_notify_days: 350,
            media_delete_days: 365,
            sso_admin_notify_days: 76,
            sso_admin_delete_days: 90,
            aad_admin_notify_days: 118,
            aad_admin_delete_days: 132,
        }
    }
}

impl LifecycleThresholds {
    pub fn media_notify(&self) -> Duration {
        Duration::days(self.media_notify_days)
    }

    pub fn media_delete(&self) -> Duration {
        Duration::days(self.media_delete_days)
    }

    pub fn sso_admin_notify(&self) -> Duration {
        Duration::days(self.sso_admin_notify_days)
    }

    pub fn sso_admin_delete(&self) -> Duration {
        Duration::days(self.sso_admin_delete_days)
    }

    pub fn aad_admin_notify(&self) -> Duration {
        Duration::days(self.aad_admin_notify_days)
    }

    pub fn aad_admin_delete(&self) -> Duration {
        Duration::days(self.aad_admin_delete_days)
    }
}

/// Filter for paged audit-log searches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    #[serde(default)]
    pub email_prefix: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<gavel_persistence::AuditAction>,
    #[serde(default)]
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_match_policy() {
        let t = LifecycleThresholds::default();
        assert_eq!(t.media_notify_days, 350);
        assert_eq!(t.media_delete_days, 365);
        assert_eq!(t.sso_admin_notify_days, 76);
        assert_eq!(t.sso_admin_delete_days, 90);
        assert_eq!(t.aad_admin_notify_days, 118);
        assert_eq!(t.aad_admin_delete_days, 132);
    }

    #[test]
    fn test_notify_precedes_delete() {
        let t = LifecycleThresholds::default();
        assert!(t.media_notify() < t.media_delete());
        assert!(t.sso_admin_notify() < t.sso_admin_delete());
        assert!(t.aad_admin_notify() < t.aad_admin_delete());
    }

    #[test]
    fn test_creation_report_accumulates() {
        let mut report = CreationReport::default();
        report.record_created("id-1".to_string());
        report.record_error("bad@user", "invalid email");
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.errored.len(), 1);
        assert_eq!(report.errored[0].message, "invalid email");
    }
}
