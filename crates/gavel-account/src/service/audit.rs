//! Audit log service
//!
//! Writes an entry for every account and application mutation, serves the
//! paged audit search, and purges entries past the retention period.

use chrono::{Duration, Utc};
use gavel_api::Page;
use gavel_common::error::GavelError;
use gavel_persistence::AuditAction;
use gavel_persistence::entity::{accounts, audit_logs};
use gavel_persistence::sea_orm::*;

use crate::model::AuditFilter;

/// Record an action performed by the given actor
pub async fn record(
    db: &DatabaseConnection,
    actor: &accounts::Model,
    action: AuditAction,
    details: &str,
) -> anyhow::Result<()> {
    let entity = audit_logs::ActiveModel {
        id: NotSet,
        user_id: Set(actor.id.clone()),
        email: Set(actor.email.clone()),
        role: Set(actor.role),
        provenance: Set(actor.provenance),
        action: Set(action),
        details: Set(details.to_string()),
        created_at: Set(Utc::now()),
    };

    audit_logs::Entity::insert(entity)
        .exec_without_returning(db)
        .await?;

    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> anyhow::Result<audit_logs::Model> {
    audit_logs::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| GavelError::IllegalArgument(format!("audit entry '{}' not found", id)).into())
}

pub async fn search_page(
    db: &DatabaseConnection,
    filter: &AuditFilter,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<audit_logs::Model>> {
    let mut select = audit_logs::Entity::find();

    if let Some(prefix) = &filter.email_prefix
        && !prefix.is_empty()
    {
        select = select.filter(audit_logs::Column::Email.starts_with(prefix.as_str()));
    }
    if let Some(user_id) = &filter.user_id
        && !user_id.is_empty()
    {
        select = select.filter(audit_logs::Column::UserId.eq(user_id.as_str()));
    }
    if !filter.actions.is_empty() {
        select = select.filter(audit_logs::Column::Action.is_in(filter.actions.iter().copied()));
    }
    if let Some(from) = filter.from {
        select = select.filter(audit_logs::Column::CreatedAt.gte(from));
    }
    if let Some(to) = filter.to {
        select = select.filter(audit_logs::Column::CreatedAt.lte(to));
    }

    let paginator = select
        .order_by_desc(audit_logs::Column::CreatedAt)
        .paginate(db, page_size);
    let total_count = paginator.num_items().await?;

    if total_count == 0 {
        return Ok(Page::empty());
    }

    let page_items = paginator.fetch_page(page_no.saturating_sub(1)).await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Delete entries older than the retention window, returning the count
pub async fn purge_expired(db: &DatabaseConnection, retention_days: i64) -> anyhow::Result<u64> {
    let cutoff = Utc::now() - Duration::days(retention_days);

    let result = audit_logs::Entity::delete_many()
        .filter(audit_logs::Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
