//! HTTP endpoint modules

use actix_web::{Scope, web};

pub mod account;
pub mod application;
pub mod audit;

pub fn routes() -> Scope {
    web::scope("/api")
        .service(account::routes())
        .service(application::routes())
        .service(audit::routes())
}
