//! Account management rules
//!
//! Pure hierarchy checks deciding whether an acting admin may create,
//! update, or delete a target account. Self-action and not-found handling
//! is done by the store-backed wrappers in `gavel-account`.

use gavel_persistence::{Provenance, Role};

use crate::model::{NON_RESTRICTED_ADMIN_ROLES, is_third_party_role};

/// Whether an actor may manage (update or delete) a target account
///
/// SSO-provenance targets are self-managing inside the internal trust
/// boundary and always pass. Otherwise the actor's tier decides: system
/// admins manage anyone, super-admins manage only non-restricted roles,
/// everyone else is denied. `None` means the actor account could not be
/// resolved to a role.
pub fn can_manage(
    actor_role: Option<Role>,
    target_role: Role,
    target_provenance: Provenance,
) -> bool {
    if target_provenance == Provenance::Sso {
        return true;
    }

    match actor_role {
        None => false,
        Some(Role::SystemAdmin) => true,
        Some(Role::SuperAdminCtsc) | Some(Role::SuperAdminLocal) => {
            NON_RESTRICTED_ADMIN_ROLES.contains(&target_role)
        }
        Some(_) => false,
    }
}

/// Whether an actor may create the given batch of candidate roles
///
/// Any third-party candidate in the batch requires a system-admin actor;
/// one disallowed candidate fails the whole batch.
pub fn can_create_accounts<I>(actor_role: Option<Role>, candidate_roles: I) -> bool
where
    I: IntoIterator<Item = Role>,
{
    let mut any_third_party = false;
    for role in candidate_roles {
        if is_third_party_role(role) {
            any_third_party = true;
            break;
        }
    }

    if any_third_party {
        actor_role == Some(Role::SystemAdmin)
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use super::*;

    #[test]
    fn test_sso_targets_always_manageable() {
        for target_role in Role::iter() {
            assert!(can_manage(None, target_role, Provenance::Sso));
            assert!(can_manage(
                Some(Role::Verified),
                target_role,
                Provenance::Sso
            ));
        }
    }

    #[test]
    fn test_missing_actor_denied() {
        for target_role in Role::iter() {
            assert!(!can_manage(None, target_role, Provenance::Aad));
        }
    }

    #[test]
    fn test_system_admin_manages_everyone() {
        for target_role in Role::iter() {
            for target_provenance in Provenance::iter() {
                assert!(can_manage(
                    Some(Role::SystemAdmin),
                    target_role,
                    target_provenance
                ));
            }
        }
    }

    #[test]
    fn test_super_admin_cannot_manage_top_tiers() {
        for actor in [Role::SuperAdminCtsc, Role::SuperAdminLocal] {
            for target in [Role::SystemAdmin, Role::SuperAdminCtsc, Role::SuperAdminLocal] {
                assert!(!can_manage(Some(actor), target, Provenance::Aad));
            }
        }
    }

    #[test]
    fn test_super_admin_manages_non_restricted_roles() {
        for actor in [Role::SuperAdminCtsc, Role::SuperAdminLocal] {
            for target in [Role::AdminCtsc, Role::AdminLocal, Role::Verified] {
                assert!(can_manage(Some(actor), target, Provenance::Aad));
            }
        }
    }

    #[test]
    fn test_lower_tiers_manage_nobody() {
        for actor in [Role::AdminCtsc, Role::AdminLocal, Role::Verified] {
            for target in Role::iter() {
                assert!(!can_manage(Some(actor), target, Provenance::Aad));
            }
        }
    }

    #[test]
    fn test_create_plain_batch_allowed_for_anyone() {
        let batch = [Role::Verified, Role::AdminLocal];
        assert!(can_create_accounts(Some(Role::SuperAdminCtsc), batch));
        assert!(can_create_accounts(Some(Role::AdminLocal), batch));
        assert!(can_create_accounts(None, batch));
    }

    #[test]
    fn test_create_third_party_requires_system_admin() {
        let batch = [Role::Verified, Role::GeneralThirdParty];
        assert!(can_create_accounts(Some(Role::SystemAdmin), batch));
        assert!(!can_create_accounts(Some(Role::SuperAdminCtsc), batch));
        assert!(!can_create_accounts(None, batch));
    }

    #[test]
    fn test_create_empty_batch_allowed() {
        assert!(can_create_accounts(None, []));
    }
}
