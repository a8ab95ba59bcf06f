use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use gavel_account::client::{
    DirectoryClient, ImageStoreClient, NotificationClient, SubscriptionClient,
};
use gavel_account::service::lifecycle;
use gavel_server::api;
use gavel_server::model::common::{AppState, Configuration};
use gavel_server::startup;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    startup::init_logging();

    let configuration = Configuration::new();
    let db = configuration.database_connection().await?;

    let directory: Arc<dyn gavel_common::traits::IdentityDirectory> =
        Arc::new(DirectoryClient::new(&configuration.directory_base_url())?);
    let notifier: Arc<dyn gavel_common::traits::NotificationDispatcher> = Arc::new(
        NotificationClient::new(&configuration.publication_base_url())?,
    );
    let subscriptions: Arc<dyn gavel_common::traits::SubscriptionService> = Arc::new(
        SubscriptionClient::new(&configuration.subscription_base_url())?,
    );
    let images: Arc<dyn gavel_common::traits::ImageStore> = Arc::new(ImageStoreClient::new(
        &configuration.image_store_base_url(),
    )?);

    lifecycle::start_lifecycle_task(
        db.clone(),
        directory.clone(),
        notifier.clone(),
        subscriptions.clone(),
        configuration.lifecycle_thresholds(),
        configuration.audit_retention_days(),
        configuration.lifecycle_interval(),
    );

    let state = AppState::new(
        db,
        directory,
        notifier,
        subscriptions,
        images,
        configuration.clone(),
    );

    let address = configuration.server_address();
    let port = configuration.server_port();
    info!("starting gavel server on {}:{}", address, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(api::routes())
    })
    .bind((address, port))?
    .run()
    .await?;

    Ok(())
}
