use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use ov_api::app::create_app;
use ov_api::routes::otp::AppState;
use ov_api::telemetry::init_tracing;
use ov_core::repositories::{MockSecretStore, SecretStore};
use ov_core::services::verification::VerificationService;
use ov_infra::{create_pool, BackendClient, MySqlSecretStore, RestIdentityStore, RestSecretStore};
use ov_shared::config::{AppConfig, SecretStoreKind};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; missing credentials stop start-up here
    let config = AppConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.logging);
    info!(environment = %config.environment, "Starting OTP verification server");

    let client = BackendClient::new(&config.backend)?;
    let identity_store = Arc::new(RestIdentityStore::new(client.clone()));

    match config.secret_store {
        SecretStoreKind::Rest => {
            let secret_store = RestSecretStore::new(client, config.backend.otp_table.clone());
            run_server(Arc::new(secret_store), identity_store, &config).await
        }
        SecretStoreKind::Mysql => {
            let database = config
                .database
                .as_ref()
                .context("DATABASE_URL is required for the mysql secret store")?;
            let pool = create_pool(database)?;
            run_server(Arc::new(MySqlSecretStore::new(pool)), identity_store, &config).await
        }
        SecretStoreKind::Memory => {
            warn!("Using the in-memory secret store; it starts empty, so /verify-otp answers 404 until records exist");
            run_server(Arc::new(MockSecretStore::new()), identity_store, &config).await
        }
    }
}

async fn run_server<S>(
    secret_store: Arc<S>,
    identity_store: Arc<RestIdentityStore>,
    config: &AppConfig,
) -> anyhow::Result<()>
where
    S: SecretStore + 'static,
{
    let service = VerificationService::new(secret_store, identity_store, config.verification.clone());
    let state = web::Data::new(AppState::new(service));

    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let bind_address = config.server.bind_address();

    info!(
        bind_address = %bind_address,
        secret_store = ?config.secret_store,
        workers = config.server.workers,
        "Server will bind to address"
    );

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, max_payload_size));
    // 0 keeps actix-web's default of one worker per core
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}
