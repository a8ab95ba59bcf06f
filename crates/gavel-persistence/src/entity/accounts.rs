//! Account entity
//!
//! One row per service user: internal admins, verified media users,
//! third-party API consumers, and system admins. The role and provenance
//! columns jointly determine which authorisation branch applies.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role, highest tier first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "SYSTEM_ADMIN")]
    SystemAdmin,
    #[sea_orm(string_value = "SUPER_ADMIN_CTSC")]
    SuperAdminCtsc,
    #[sea_orm(string_value = "SUPER_ADMIN_LOCAL")]
    SuperAdminLocal,
    #[sea_orm(string_value = "ADMIN_CTSC")]
    AdminCtsc,
    #[sea_orm(string_value = "ADMIN_LOCAL")]
    AdminLocal,
    /// Accredited media user
    #[sea_orm(string_value = "VERIFIED")]
    Verified,
    #[sea_orm(string_value = "GENERAL_THIRD_PARTY")]
    GeneralThirdParty,
    #[sea_orm(string_value = "THIRD_PARTY_ALL")]
    ThirdPartyAll,
    #[sea_orm(string_value = "THIRD_PARTY_PRESS")]
    ThirdPartyPress,
    #[sea_orm(string_value = "THIRD_PARTY_CRIME")]
    ThirdPartyCrime,
    #[sea_orm(string_value = "THIRD_PARTY_CFT")]
    ThirdPartyCft,
}

impl Role {
    /// Stable wire name, matching the persisted value
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SYSTEM_ADMIN",
            Role::SuperAdminCtsc => "SUPER_ADMIN_CTSC",
            Role::SuperAdminLocal => "SUPER_ADMIN_LOCAL",
            Role::AdminCtsc => "ADMIN_CTSC",
            Role::AdminLocal => "ADMIN_LOCAL",
            Role::Verified => "VERIFIED",
            Role::GeneralThirdParty => "GENERAL_THIRD_PARTY",
            Role::ThirdPartyAll => "THIRD_PARTY_ALL",
            Role::ThirdPartyPress => "THIRD_PARTY_PRESS",
            Role::ThirdPartyCrime => "THIRD_PARTY_CRIME",
            Role::ThirdPartyCft => "THIRD_PARTY_CFT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM_ADMIN" => Ok(Role::SystemAdmin),
            "SUPER_ADMIN_CTSC" => Ok(Role::SuperAdminCtsc),
            "SUPER_ADMIN_LOCAL" => Ok(Role::SuperAdminLocal),
            "ADMIN_CTSC" => Ok(Role::AdminCtsc),
            "ADMIN_LOCAL" => Ok(Role::AdminLocal),
            "VERIFIED" => Ok(Role::Verified),
            "GENERAL_THIRD_PARTY" => Ok(Role::GeneralThirdParty),
            "THIRD_PARTY_ALL" => Ok(Role::ThirdPartyAll),
            "THIRD_PARTY_PRESS" => Ok(Role::ThirdPartyPress),
            "THIRD_PARTY_CRIME" => Ok(Role::ThirdPartyCrime),
            "THIRD_PARTY_CFT" => Ok(Role::ThirdPartyCft),
            _ => Err(format!("unknown role '{}'", s)),
        }
    }
}

/// Originating identity system for an account
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// Internal single sign-on; accounts are self-managing
    #[sea_orm(string_value = "SSO")]
    Sso,
    /// External directory backing admin and media accounts
    #[sea_orm(string_value = "AAD")]
    Aad,
    /// Civil and family tribunals identity provider
    #[sea_orm(string_value = "CFT_IDAM")]
    CftIdam,
    /// Criminal courts identity provider
    #[sea_orm(string_value = "CRIME_IDAM")]
    CrimeIdam,
    #[sea_orm(string_value = "THIRD_PARTY")]
    ThirdParty,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Sso => "SSO",
            Provenance::Aad => "AAD",
            Provenance::CftIdam => "CFT_IDAM",
            Provenance::CrimeIdam => "CRIME_IDAM",
            Provenance::ThirdParty => "THIRD_PARTY",
        }
    }

    /// Whether accounts of this provenance hold an entry in the external
    /// identity directory that must be cleaned up on deletion
    pub fn is_directory_backed(&self) -> bool {
        matches!(self, Provenance::Aad)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSO" => Ok(Provenance::Sso),
            "AAD" => Ok(Provenance::Aad),
            "CFT_IDAM" => Ok(Provenance::CftIdam),
            "CRIME_IDAM" => Ok(Provenance::CrimeIdam),
            "THIRD_PARTY" => Ok(Provenance::ThirdParty),
            _ => Err(format!("unknown provenance '{}'", s)),
        }
    }
}


#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    pub first_name: Option<String>,

    pub surname: Option<String>,

    pub role: Role,

    pub provenance: Provenance,

    /// Id of this account in its originating identity system
    #[sea_orm(indexed)]
    pub provenance_user_id: String,

    pub created_at: DateTimeUtc,

    /// Media accounts: last accreditation re-verification
    #[sea_orm(nullable)]
    pub last_verified_at: Option<DateTimeUtc>,

    /// Admin accounts: last successful sign-in
    #[sea_orm(nullable)]
    pub last_signed_in_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        gavel_common::utils::full_name(
            self.first_name.as_deref().unwrap_or_default(),
            self.surname.as_deref().unwrap_or_default(),
        )
    }
}
