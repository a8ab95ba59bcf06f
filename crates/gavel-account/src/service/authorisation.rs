//! Store-backed authorisation checks
//!
//! Wraps the pure rules in `gavel_auth` with account lookups. A missing
//! target or actor account surfaces as `AccountNotFound`, never a silent
//! deny.

use gavel_auth::{ListType, Sensitivity};
use gavel_common::error::GavelError;
use gavel_persistence::entity::accounts;
use gavel_persistence::sea_orm::*;
use gavel_persistence::{Provenance, Role};

/// Whether the actor may manage the target account
///
/// `actor_id` of `None` models an unauthenticated caller; the rule then
/// only passes for self-managing SSO targets.
pub async fn is_authorised_role(
    db: &DatabaseConnection,
    target_id: &str,
    actor_id: Option<&str>,
) -> anyhow::Result<bool> {
    let target = accounts::Entity::find_by_id(target_id)
        .one(db)
        .await?
        .ok_or_else(|| GavelError::AccountNotFound(target_id.to_string()))?;

    // SSO accounts are self-managing, no actor lookup needed
    if target.provenance == Provenance::Sso {
        return Ok(true);
    }

    let actor_role: Option<Role> = match actor_id {
        None => None,
        Some(id) => {
            let actor = accounts::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| GavelError::AccountNotFound(id.to_string()))?;
            Some(actor.role)
        }
    };

    Ok(gavel_auth::can_manage(
        actor_role,
        target.role,
        target.provenance,
    ))
}

/// Whether the account may view a publication of the given sensitivity
/// within a list type
///
/// An unknown list type is a caller error, not a deny.
pub async fn can_view_publication(
    db: &DatabaseConnection,
    user_id: &str,
    list_type_name: &str,
    sensitivity: Sensitivity,
) -> anyhow::Result<bool> {
    let list_type = ListType::by_name(list_type_name).ok_or_else(|| {
        GavelError::IllegalArgument(format!("unknown list type '{}'", list_type_name))
    })?;

    let account = accounts::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| GavelError::AccountNotFound(user_id.to_string()))?;

    Ok(gavel_auth::is_authorised(
        account.role,
        account.provenance,
        list_type,
        sensitivity,
    ))
}

/// Whether the actor may update the target's role
///
/// Self-update is always forbidden, before any hierarchy check.
pub async fn can_update_account(
    db: &DatabaseConnection,
    actor_id: &str,
    target_id: &str,
) -> anyhow::Result<bool> {
    if actor_id == target_id {
        return Ok(false);
    }

    is_authorised_role(db, target_id, Some(actor_id)).await
}

/// Whether the actor may delete the target account
///
/// Self-deletion is forbidden on the same grounds as self-update.
pub async fn can_delete_account(
    db: &DatabaseConnection,
    actor_id: &str,
    target_id: &str,
) -> anyhow::Result<bool> {
    if actor_id == target_id {
        return Ok(false);
    }

    is_authorised_role(db, target_id, Some(actor_id)).await
}
