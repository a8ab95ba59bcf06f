//! Media accreditation application endpoints

use actix_web::{HttpRequest, Responder, get, post, put, web};
use serde::Deserialize;

use gavel_account::service::application::{self, ApplicationRequest};
use gavel_account::service::{account, audit};
use gavel_persistence::{ApplicationStatus, AuditAction};

use crate::api::account::issuer_id;
use crate::model::common::AppState;
use crate::model::response::{Result, handle_error, http_success};

/// POST /api/application
///
/// Open to unauthenticated applicants; the issuer header is optional and
/// only used to attribute an audit entry when an admin submits on an
/// applicant's behalf.
#[post("")]
async fn submit_application(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ApplicationRequest>,
) -> impl Responder {
    let submitted = match application::submit(data.db(), body.into_inner()).await {
        Ok(submitted) => submitted,
        Err(err) => return handle_error(err),
    };

    if let Some(issuer) = issuer_id(&req)
        && let Ok(actor) = account::find_by_id(data.db(), &issuer).await
        && let Err(err) = audit::record(
            data.db(),
            &actor,
            AuditAction::ApplicationSubmitted,
            &format!("application '{}' for '{}'", submitted.id, submitted.email),
        )
        .await
    {
        tracing::warn!(
            "audit write failed for application '{}': {}",
            submitted.id,
            err
        );
    }

    http_success(submitted)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationListQuery {
    #[serde(default)]
    status: Option<ApplicationStatus>,
    #[serde(default = "default_page_no")]
    page_no: u64,
    #[serde(default = "default_page_size")]
    page_size: u64,
}

fn default_page_no() -> u64 {
    1
}

fn default_page_size() -> u64 {
    25
}

/// GET /api/application
#[get("")]
async fn list_applications(
    data: web::Data<AppState>,
    params: web::Query<ApplicationListQuery>,
) -> impl Responder {
    match application::search_page(data.db(), params.status, params.page_no, params.page_size).await
    {
        Ok(page) => http_success(page),
        Err(err) => handle_error(err),
    }
}

/// GET /api/application/reporting
///
/// Returns every stored application and sweeps out the decided ones.
#[get("/reporting")]
async fn reporting_extract(data: web::Data<AppState>) -> impl Responder {
    match application::reporting_extract(data.db()).await {
        Ok(rows) => http_success(rows),
        Err(err) => handle_error(err),
    }
}

/// GET /api/application/{id}
#[get("/{id}")]
async fn get_application(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match application::find_by_id(data.db(), &path.into_inner()).await {
        Ok(found) => http_success(found),
        Err(err) => handle_error(err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    status: ApplicationStatus,
    #[serde(default)]
    rejection_reasons: Option<String>,
}

/// PUT /api/application/{id}/status
#[put("/{id}/status")]
async fn update_application_status(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdate>,
) -> impl Responder {
    let Some(issuer) = issuer_id(&req) else {
        return Result::<String>::http_response(
            400,
            gavel_common::error::PARAMETER_MISSING.code,
            format!(
                "required header '{}' is missing",
                gavel_common::ISSUER_ID_HEADER
            ),
            String::new(),
        );
    };
    let id = path.into_inner();
    let update = body.into_inner();

    let updated = match application::update_status(
        data.db(),
        data.images(),
        data.notifier(),
        &id,
        update.status,
        update.rejection_reasons,
    )
    .await
    {
        Ok(updated) => updated,
        Err(err) => return handle_error(err),
    };

    let action = match updated.status {
        ApplicationStatus::Approved => Some(AuditAction::ApplicationApproved),
        ApplicationStatus::Rejected => Some(AuditAction::ApplicationRejected),
        ApplicationStatus::Pending => None,
    };
    if let Some(action) = action
        && let Ok(actor) = account::find_by_id(data.db(), &issuer).await
        && let Err(err) = audit::record(
            data.db(),
            &actor,
            action,
            &format!("application '{}' for '{}'", id, updated.email),
        )
        .await
    {
        tracing::warn!("audit write failed for application '{}': {}", id, err);
    }

    http_success(updated)
}

pub fn routes() -> actix_web::Scope {
    // Literal segments must register ahead of the `{id}` catch-alls
    web::scope("/application")
        .service(submit_application)
        .service(list_applications)
        .service(reporting_extract)
        .service(get_application)
        .service(update_application_status)
}
