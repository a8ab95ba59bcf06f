//! Media accreditation application service

use chrono::Utc;
use gavel_api::Page;
use gavel_common::error::GavelError;
use gavel_common::traits::{ImageStore, NotificationDispatcher};
use gavel_persistence::ApplicationStatus;
use gavel_persistence::entity::media_applications;
use gavel_persistence::sea_orm::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Incoming accreditation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub full_name: String,
    pub email: String,
    pub employer: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

pub async fn submit(
    db: &DatabaseConnection,
    request: ApplicationRequest,
) -> anyhow::Result<media_applications::Model> {
    if !gavel_common::utils::is_valid_email(&request.email) {
        return Err(GavelError::Validation(format!("invalid email '{}'", request.email)).into());
    }

    let now = Utc::now();
    let model = media_applications::Model {
        id: Uuid::new_v4().to_string(),
        full_name: request.full_name,
        email: request.email,
        employer: request.employer,
        status: ApplicationStatus::Pending,
        image_ref: request.image_ref,
        rejection_reasons: None,
        created_at: now,
        status_updated_at: now,
    };

    media_applications::Entity::insert(media_applications::ActiveModel::from(model.clone()))
        .exec_without_returning(db)
        .await?;

    info!("media application '{}' submitted", model.id);
    Ok(model)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> anyhow::Result<media_applications::Model> {
    media_applications::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| GavelError::ApplicationNotFound(id.to_string()).into())
}

pub async fn search_page(
    db: &DatabaseConnection,
    status: Option<ApplicationStatus>,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<media_applications::Model>> {
    let mut select = media_applications::Entity::find();

    if let Some(status) = status {
        select = select.filter(media_applications::Column::Status.eq(status));
    }

    let paginator = select
        .order_by_asc(media_applications::Column::CreatedAt)
        .paginate(db, page_size);
    let total_count = paginator.num_items().await?;

    if total_count == 0 {
        return Ok(Page::empty());
    }

    let page_items = paginator.fetch_page(page_no.saturating_sub(1)).await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Decide a pending application
///
/// Only pending applications may transition. The stored press-card image
/// is removed on either decision; the applicant is emailed the outcome.
/// Both side effects are best-effort.
pub async fn update_status(
    db: &DatabaseConnection,
    images: &dyn ImageStore,
    notifier: &dyn NotificationDispatcher,
    id: &str,
    new_status: ApplicationStatus,
    rejection_reasons: Option<String>,
) -> anyhow::Result<media_applications::Model> {
    let application = find_by_id(db, id).await?;

    if application.status != ApplicationStatus::Pending {
        return Err(GavelError::Validation(format!(
            "application '{}' has already been decided",
            id
        ))
        .into());
    }
    if new_status == ApplicationStatus::Pending {
        return Err(
            GavelError::Validation("an application cannot return to pending".to_string()).into(),
        );
    }

    if let Some(image_ref) = &application.image_ref {
        if let Err(e) = images.delete_image(image_ref).await {
            warn!("image cleanup for application '{}' failed: {}", id, e);
        }
    }

    let approved = new_status == ApplicationStatus::Approved;
    let reasons = rejection_reasons.clone().unwrap_or_default();
    if let Err(e) = notifier
        .send_media_application_update(&application.email, &application.full_name, approved, &reasons)
        .await
    {
        warn!("decision email for application '{}' failed: {}", id, e);
    }

    let mut active: media_applications::ActiveModel = application.into();
    active.status = Set(new_status);
    active.image_ref = Set(None);
    active.rejection_reasons = Set(rejection_reasons);
    active.status_updated_at = Set(Utc::now());

    Ok(active.update(db).await?)
}

/// Reporting extract of all applications
///
/// Approved and rejected applications are swept out once reported.
pub async fn reporting_extract(
    db: &DatabaseConnection,
) -> anyhow::Result<Vec<media_applications::Model>> {
    let applications = media_applications::Entity::find().all(db).await?;

    let removed = media_applications::Entity::delete_many()
        .filter(
            media_applications::Column::Status
                .is_in([ApplicationStatus::Approved, ApplicationStatus::Rejected]),
        )
        .exec(db)
        .await?;
    if removed.rows_affected > 0 {
        info!(
            "removed {} decided media application(s) after reporting",
            removed.rows_affected
        );
    }

    Ok(applications)
}

#[cfg(test)]
mod tests {
    use gavel_persistence::sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;
    use crate::service::lifecycle::test_support::{FakeImageStore, FakeNotifier};

    fn pending(id: &str) -> media_applications::Model {
        media_applications::Model {
            id: id.to_string(),
            full_name: "Pat Reporter".to_string(),
            email: "pat@media.example".to_string(),
            employer: "The Daily Gavel".to_string(),
            status: ApplicationStatus::Pending,
            image_ref: Some(format!("img-{id}")),
            rejection_reasons: None,
            created_at: Utc::now(),
            status_updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_rejection_deletes_image_and_notifies() {
        let application = pending("app-1");
        let mut decided = application.clone();
        decided.status = ApplicationStatus::Rejected;
        decided.image_ref = None;
        decided.rejection_reasons = Some("no accreditation".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![application], vec![decided]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let images = FakeImageStore::default();
        let notifier = FakeNotifier::default();

        let updated = update_status(
            &db,
            &images,
            &notifier,
            "app-1",
            ApplicationStatus::Rejected,
            Some("no accreditation".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(updated.status, ApplicationStatus::Rejected);
        assert_eq!(images.deleted(), vec!["img-app-1".to_string()]);
        assert_eq!(notifier.application_updates(), 1);
    }

    #[tokio::test]
    async fn test_decided_application_cannot_transition() {
        let mut application = pending("app-2");
        application.status = ApplicationStatus::Approved;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![application]])
            .into_connection();

        let err = update_status(
            &db,
            &FakeImageStore::default(),
            &FakeNotifier::default(),
            "app-2",
            ApplicationStatus::Rejected,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GavelError>(),
            Some(GavelError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let request = ApplicationRequest {
            full_name: "No Email".to_string(),
            email: "nope".to_string(),
            employer: "None".to_string(),
            image_ref: None,
        };
        assert!(submit(&db, request).await.is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }
}
