//! Role membership sets, sensitivity tiers, and the list-type registry

use gavel_persistence::{Provenance, Role};
use serde::{Deserialize, Serialize};

/// Publication visibility tier, increasing restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sensitivity {
    Public,
    Private,
    Classified,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Public => "PUBLIC",
            Sensitivity::Private => "PRIVATE",
            Sensitivity::Classified => "CLASSIFIED",
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Sensitivity::Public),
            "PRIVATE" => Ok(Sensitivity::Private),
            "CLASSIFIED" => Ok(Sensitivity::Classified),
            _ => Err(format!("unknown sensitivity '{}'", s)),
        }
    }
}

/// Roles treated as verified-equivalent for private content:
/// accredited media plus every internal admin tier
pub const VERIFIED_ROLES: &[Role] = &[
    Role::Verified,
    Role::SystemAdmin,
    Role::SuperAdminCtsc,
    Role::SuperAdminLocal,
    Role::AdminCtsc,
    Role::AdminLocal,
];

/// Roles a super-admin may manage. System-admin and super-admin targets
/// can only be managed by a system admin.
pub const NON_RESTRICTED_ADMIN_ROLES: &[Role] =
    &[Role::AdminCtsc, Role::AdminLocal, Role::Verified];

/// Third-party API consumer roles
pub const THIRD_PARTY_ROLES: &[Role] = &[
    Role::GeneralThirdParty,
    Role::ThirdPartyAll,
    Role::ThirdPartyPress,
    Role::ThirdPartyCrime,
    Role::ThirdPartyCft,
];

/// Default account-search filter: everything except third-party consumers
pub const NON_THIRD_PARTY_ROLES: &[Role] = &[
    Role::SystemAdmin,
    Role::SuperAdminCtsc,
    Role::SuperAdminLocal,
    Role::AdminCtsc,
    Role::AdminLocal,
    Role::Verified,
];

/// Internal admin tiers (super-admins and admins, both CTSC and local)
pub const INTERNAL_ADMIN_ROLES: &[Role] = &[
    Role::SuperAdminCtsc,
    Role::SuperAdminLocal,
    Role::AdminCtsc,
    Role::AdminLocal,
];

/// A category of published content with its own classified-access rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListType {
    pub name: &'static str,
    /// Provenance whose verified users may view classified publications
    pub allowed_provenance: Provenance,
    /// Third-party roles granted classified access for this list
    pub allowed_third_party_roles: &'static [Role],
}

/// Registry of known list types
pub const LIST_TYPES: &[ListType] = &[
    ListType {
        name: "CIVIL_DAILY_CAUSE_LIST",
        allowed_provenance: Provenance::CftIdam,
        allowed_third_party_roles: &[Role::ThirdPartyAll, Role::ThirdPartyCft],
    },
    ListType {
        name: "FAMILY_DAILY_CAUSE_LIST",
        allowed_provenance: Provenance::CftIdam,
        allowed_third_party_roles: &[Role::ThirdPartyAll, Role::ThirdPartyCft],
    },
    ListType {
        name: "CROWN_DAILY_LIST",
        allowed_provenance: Provenance::CrimeIdam,
        allowed_third_party_roles: &[Role::ThirdPartyAll, Role::ThirdPartyCrime],
    },
    ListType {
        name: "MAGISTRATES_PUBLIC_LIST",
        allowed_provenance: Provenance::CrimeIdam,
        allowed_third_party_roles: &[Role::ThirdPartyAll, Role::ThirdPartyCrime],
    },
    ListType {
        name: "SJP_PRESS_LIST",
        allowed_provenance: Provenance::Aad,
        allowed_third_party_roles: &[Role::ThirdPartyAll, Role::ThirdPartyPress],
    },
];

impl ListType {
    pub fn by_name(name: &str) -> Option<&'static ListType> {
        LIST_TYPES.iter().find(|lt| lt.name == name)
    }
}

/// Whether a role belongs to the third-party consumer set
pub fn is_third_party_role(role: Role) -> bool {
    THIRD_PARTY_ROLES.contains(&role)
}
