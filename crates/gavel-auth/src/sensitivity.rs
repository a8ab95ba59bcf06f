//! Publication visibility rule
//!
//! Decides whether a user may view a publication of a given sensitivity
//! within a given list type. Total over every role/provenance/sensitivity
//! combination.

use gavel_persistence::{Provenance, Role};

use crate::model::{ListType, Sensitivity, VERIFIED_ROLES};

/// Whether an account may view a publication
///
/// - `Public` is visible to everyone.
/// - `Private` requires a verified-equivalent role.
/// - `Classified` requires either a verified media account from the list
///   type's allowed provenance, or a third-party account whose role the
///   list type explicitly grants.
pub fn is_authorised(
    role: Role,
    provenance: Provenance,
    list_type: &ListType,
    sensitivity: Sensitivity,
) -> bool {
    match sensitivity {
        Sensitivity::Public => true,
        Sensitivity::Private => VERIFIED_ROLES.contains(&role),
        Sensitivity::Classified => {
            (role == Role::Verified && provenance == list_type.allowed_provenance)
                || (provenance == Provenance::ThirdParty
                    && list_type.allowed_third_party_roles.contains(&role))
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use super::*;
    use crate::model::LIST_TYPES;

    const SENSITIVITIES: [Sensitivity; 3] = [
        Sensitivity::Public,
        Sensitivity::Private,
        Sensitivity::Classified,
    ];

    #[test]
    fn test_public_always_visible() {
        for role in Role::iter() {
            for provenance in Provenance::iter() {
                for list_type in LIST_TYPES {
                    assert!(is_authorised(
                        role,
                        provenance,
                        list_type,
                        Sensitivity::Public
                    ));
                }
            }
        }
    }

    #[test]
    fn test_private_requires_verified_role() {
        for role in Role::iter() {
            for provenance in Provenance::iter() {
                for list_type in LIST_TYPES {
                    let expected = VERIFIED_ROLES.contains(&role);
                    assert_eq!(
                        is_authorised(role, provenance, list_type, Sensitivity::Private),
                        expected,
                        "role {role} provenance {provenance}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_classified_verified_matching_provenance() {
        for list_type in LIST_TYPES {
            assert!(is_authorised(
                Role::Verified,
                list_type.allowed_provenance,
                list_type,
                Sensitivity::Classified
            ));
        }
    }

    #[test]
    fn test_classified_verified_wrong_provenance() {
        for list_type in LIST_TYPES {
            for provenance in Provenance::iter() {
                if provenance == list_type.allowed_provenance {
                    continue;
                }
                assert!(
                    !is_authorised(
                        Role::Verified,
                        provenance,
                        list_type,
                        Sensitivity::Classified
                    ),
                    "provenance {provenance} should be denied for {}",
                    list_type.name
                );
            }
        }
    }

    #[test]
    fn test_classified_third_party_roles() {
        for list_type in LIST_TYPES {
            for role in Role::iter() {
                let expected = list_type.allowed_third_party_roles.contains(&role);
                assert_eq!(
                    is_authorised(
                        role,
                        Provenance::ThirdParty,
                        list_type,
                        Sensitivity::Classified
                    ),
                    // A verified role with third-party provenance never matches
                    // the allowed provenance, so only the third-party grant applies
                    expected,
                    "role {role} on {}",
                    list_type.name
                );
            }
        }
    }

    #[test]
    fn test_classified_admins_denied() {
        // Admin tiers see private content but classified is gated on
        // provenance and third-party grants, not tier
        for list_type in LIST_TYPES {
            for role in [Role::SystemAdmin, Role::SuperAdminCtsc, Role::AdminLocal] {
                assert!(!is_authorised(
                    role,
                    Provenance::Aad,
                    list_type,
                    Sensitivity::Classified
                ) || list_type.allowed_third_party_roles.contains(&role));
            }
        }
    }

    #[test]
    fn test_rule_is_total() {
        // Exhaustive cross-product must evaluate without panicking
        let mut combinations = 0u32;
        for role in Role::iter() {
            for provenance in Provenance::iter() {
                for list_type in LIST_TYPES {
                    for sensitivity in SENSITIVITIES {
                        let _ = is_authorised(role, provenance, list_type, sensitivity);
                        combinations += 1;
                    }
                }
            }
        }
        assert_eq!(combinations, 11 * 5 * 5 * 3);
    }
}
