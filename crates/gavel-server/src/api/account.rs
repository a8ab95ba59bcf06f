//! Account management endpoints
//!
//! The id of the admin issuing a request travels in the `x-issuer-id`
//! header; endpoints that mutate accounts reject requests without it.

use actix_web::{HttpRequest, Responder, delete, get, post, put, web};
use serde::Deserialize;

use gavel_account::model::AccountFilter;
use gavel_account::service::{account, audit, authorisation};
use gavel_account::AccountRequest;
use gavel_api::PageParam;
use gavel_auth::Sensitivity;
use gavel_common::ISSUER_ID_HEADER;
use gavel_common::error::{self, GavelError};
use gavel_persistence::{AuditAction, Provenance, Role};

use crate::model::common::AppState;
use crate::model::response::{Result, handle_error, http_success};

pub(crate) fn issuer_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(ISSUER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn missing_issuer() -> actix_web::HttpResponse {
    Result::<String>::http_response(
        400,
        error::PARAMETER_MISSING.code,
        format!("required header '{}' is missing", ISSUER_ID_HEADER),
        String::new(),
    )
}

fn invalid_path(message: String) -> actix_web::HttpResponse {
    Result::<String>::http_response(
        400,
        error::PARAMETER_VALIDATE_ERROR.code,
        message,
        String::new(),
    )
}

/// POST /api/account
///
/// Batch creation: partial success, per-record errors in the report.
#[post("")]
async fn create_accounts(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<Vec<AccountRequest>>,
) -> impl Responder {
    let Some(issuer) = issuer_id(&req) else {
        return missing_issuer();
    };

    match account::create_accounts(
        data.db(),
        data.directory(),
        data.notifier(),
        &issuer,
        body.into_inner(),
    )
    .await
    {
        Ok(report) => http_success(report),
        Err(err) => handle_error(err),
    }
}

/// POST /api/account/system-admin
#[post("/system-admin")]
async fn create_system_admin(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<AccountRequest>,
) -> impl Responder {
    let Some(issuer) = issuer_id(&req) else {
        return missing_issuer();
    };
    let max_system_admins = data.configuration().max_system_admins();

    match account::create_system_admin(
        data.db(),
        data.directory(),
        &issuer,
        body.into_inner(),
        max_system_admins,
    )
    .await
    {
        Ok(created) => http_success(created),
        Err(err) => handle_error(err),
    }
}

/// POST /api/account/filtered
#[post("/filtered")]
async fn search_accounts(
    data: web::Data<AppState>,
    params: web::Query<PageParam>,
    body: web::Json<AccountFilter>,
) -> impl Responder {
    match account::search_page(data.db(), &body, params.page_no, params.page_size).await {
        Ok(page) => http_success(page),
        Err(err) => handle_error(err),
    }
}

/// GET /api/account/mi-report
#[get("/mi-report")]
async fn mi_report(data: web::Data<AppState>) -> impl Responder {
    match account::mi_report(data.db()).await {
        Ok(rows) => http_success(rows),
        Err(err) => handle_error(err),
    }
}

/// GET /api/account/provenance/{provenance}/{provenanceUserId}
#[get("/provenance/{provenance}/{provenance_user_id}")]
async fn get_by_provenance(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (provenance, provenance_user_id) = path.into_inner();
    let provenance = match provenance.parse::<Provenance>() {
        Ok(value) => value,
        Err(message) => return invalid_path(message),
    };

    match account::find_by_provenance(data.db(), provenance, &provenance_user_id).await {
        Ok(found) => http_success(found),
        Err(err) => handle_error(err),
    }
}

/// PUT /api/account/provenance/{provenance}/{provenanceUserId}/verification
#[put("/provenance/{provenance}/{provenance_user_id}/verification")]
async fn record_verification(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (provenance, provenance_user_id) = path.into_inner();
    let provenance = match provenance.parse::<Provenance>() {
        Ok(value) => value,
        Err(message) => return invalid_path(message),
    };

    match account::record_verification(data.db(), provenance, &provenance_user_id).await {
        Ok(updated) => http_success(updated),
        Err(err) => handle_error(err),
    }
}

/// PUT /api/account/provenance/{provenance}/{provenanceUserId}/sign-in
#[put("/provenance/{provenance}/{provenance_user_id}/sign-in")]
async fn record_sign_in(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (provenance, provenance_user_id) = path.into_inner();
    let provenance = match provenance.parse::<Provenance>() {
        Ok(value) => value,
        Err(message) => return invalid_path(message),
    };

    match account::record_sign_in(data.db(), provenance, &provenance_user_id).await {
        Ok(updated) => http_success(updated),
        Err(err) => handle_error(err),
    }
}

/// GET /api/account/authorisation/{targetId}
///
/// Whether the issuing admin may manage the target account. The issuer
/// header is optional here; an absent issuer is simply unauthorised for
/// anything but a self-managing target.
#[get("/authorisation/{target_id}")]
async fn check_authorisation(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let target_id = path.into_inner();
    let issuer = issuer_id(&req);

    match authorisation::is_authorised_role(data.db(), &target_id, issuer.as_deref()).await {
        Ok(allowed) => http_success(allowed),
        Err(err) => handle_error(err),
    }
}

/// GET /api/account/authorised/{userId}/{listType}/{sensitivity}
///
/// Whether the account may view a publication of the given sensitivity
/// within a list type. Consumed by the publication service.
#[get("/authorised/{user_id}/{list_type}/{sensitivity}")]
async fn check_publication_access(
    data: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> impl Responder {
    let (user_id, list_type, sensitivity) = path.into_inner();
    let sensitivity = match sensitivity.parse::<Sensitivity>() {
        Ok(value) => value,
        Err(message) => return invalid_path(message),
    };

    match authorisation::can_view_publication(data.db(), &user_id, &list_type, sensitivity).await {
        Ok(allowed) => http_success(allowed),
        Err(err) => handle_error(err),
    }
}

/// DELETE /api/account/testing-support/{emailPrefix}
///
/// Bulk cleanup of generated test accounts by email prefix.
#[delete("/testing-support/{email_prefix}")]
async fn delete_by_prefix(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let prefix = path.into_inner();

    match account::delete_accounts_with_prefix(
        data.db(),
        data.directory(),
        data.subscriptions(),
        &prefix,
    )
    .await
    {
        Ok(message) => http_success(message),
        Err(err) => handle_error(err),
    }
}

/// GET /api/account/{id}
#[get("/{id}")]
async fn get_account(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match account::find_by_id(data.db(), &path.into_inner()).await {
        Ok(found) => http_success(found),
        Err(err) => handle_error(err),
    }
}

/// DELETE /api/account/{id}
#[delete("/{id}")]
async fn delete_account(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let Some(issuer) = issuer_id(&req) else {
        return missing_issuer();
    };
    let target_id = path.into_inner();

    match authorisation::can_delete_account(data.db(), &issuer, &target_id).await {
        Ok(true) => {}
        Ok(false) => {
            return handle_error(
                GavelError::Forbidden(format!(
                    "user '{}' may not delete account '{}'",
                    issuer, target_id
                ))
                .into(),
            );
        }
        Err(err) => return handle_error(err),
    }

    let message = match account::delete_account(
        data.db(),
        data.directory(),
        data.subscriptions(),
        &target_id,
    )
    .await
    {
        Ok(message) => message,
        Err(err) => return handle_error(err),
    };

    // The authorisation check already proved the issuer exists
    if let Ok(actor) = account::find_by_id(data.db(), &issuer).await
        && let Err(err) = audit::record(
            data.db(),
            &actor,
            AuditAction::AccountDeleted,
            &format!("deleted account '{}'", target_id),
        )
        .await
    {
        tracing::warn!("audit write failed for deletion of '{}': {}", target_id, err);
    }

    http_success(message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleUpdate {
    role: Role,
}

/// PUT /api/account/{id}/role
#[put("/{id}/role")]
async fn update_role(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RoleUpdate>,
) -> impl Responder {
    let Some(issuer) = issuer_id(&req) else {
        return missing_issuer();
    };

    match account::update_role(
        data.db(),
        data.directory(),
        &issuer,
        &path.into_inner(),
        body.role,
    )
    .await
    {
        Ok(message) => http_success(message),
        Err(err) => handle_error(err),
    }
}

pub fn routes() -> actix_web::Scope {
    // Literal segments must register ahead of the `{id}` catch-alls
    web::scope("/account")
        .service(create_accounts)
        .service(create_system_admin)
        .service(search_accounts)
        .service(mi_report)
        .service(get_by_provenance)
        .service(record_verification)
        .service(record_sign_in)
        .service(check_authorisation)
        .service(check_publication_access)
        .service(delete_by_prefix)
        .service(get_account)
        .service(delete_account)
        .service(update_role)
}
