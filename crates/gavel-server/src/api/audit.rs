//! Audit log endpoints

use actix_web::{Responder, get, post, web};

use gavel_account::model::AuditFilter;
use gavel_account::service::audit;
use gavel_api::PageParam;

use crate::model::common::AppState;
use crate::model::response::{Result, handle_error, http_success};

/// POST /api/audit/filtered
#[post("/filtered")]
async fn search_audit_logs(
    data: web::Data<AppState>,
    params: web::Query<PageParam>,
    body: web::Json<AuditFilter>,
) -> impl Responder {
    match audit::search_page(data.db(), &body, params.page_no, params.page_size).await {
        Ok(page) => http_success(page),
        Err(err) => handle_error(err),
    }
}

/// GET /api/audit/{id}
#[get("/{id}")]
async fn get_audit_log(data: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match audit::find_by_id(data.db(), path.into_inner()).await {
        Ok(entry) => http_success(entry),
        Err(err) => handle_error(err),
    }
}

pub fn routes() -> actix_web::Scope {
    web::scope("/audit")
        .service(search_audit_logs)
        .service(get_audit_log)
}
