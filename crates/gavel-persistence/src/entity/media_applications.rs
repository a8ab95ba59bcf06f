//! Media accreditation application entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accreditation decision state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ApplicationStatus {
    /// Approved and rejected applications are terminal; they are swept
    /// out in bulk during reporting
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_applications")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    #[sea_orm(indexed)]
    pub email: String,

    pub employer: String,

    pub status: ApplicationStatus,

    /// Reference to the press-card image in the image store
    #[sea_orm(nullable)]
    pub image_ref: Option<String>,

    /// Reasons supplied on rejection, free text
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reasons: Option<String>,

    pub created_at: DateTimeUtc,

    pub status_updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
