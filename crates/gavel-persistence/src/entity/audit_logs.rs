//! Audit log entity
//!
//! Immutable record of account and application mutations. Entries are
//! purged in bulk once older than the configured retention period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::accounts::{Provenance, Role};

/// Kind of audited action
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(48))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "ACCOUNT_CREATED")]
    AccountCreated,
    #[sea_orm(string_value = "SYSTEM_ADMIN_CREATED")]
    SystemAdminCreated,
    #[sea_orm(string_value = "ACCOUNT_DELETED")]
    AccountDeleted,
    #[sea_orm(string_value = "ROLE_UPDATED")]
    RoleUpdated,
    #[sea_orm(string_value = "APPLICATION_SUBMITTED")]
    ApplicationSubmitted,
    #[sea_orm(string_value = "APPLICATION_APPROVED")]
    ApplicationApproved,
    #[sea_orm(string_value = "APPLICATION_REJECTED")]
    ApplicationRejected,
    #[sea_orm(string_value = "INACTIVE_ACCOUNT_DELETED")]
    InactiveAccountDeleted,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Actor who performed the action
    #[sea_orm(indexed)]
    pub user_id: String,

    pub email: String,

    pub role: Role,

    pub provenance: Provenance,

    pub action: AuditAction,

    #[sea_orm(column_type = "Text")]
    pub details: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
