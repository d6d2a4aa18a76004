//! Application factory
//!
//! Builds the Actix-web application around a shared `AppState`.

use actix_web::body::MessageBody;
use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use ov_core::repositories::{IdentityStore, SecretStore};
use ov_shared::config::CorsConfig;
use ov_shared::{error_codes, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::cors::create_cors;
use crate::routes::otp::{verify_otp, AppState};

/// Text served on `GET /`
pub const ROOT_MESSAGE: &str = "OTP verification server is running";

/// Create and configure the application with all dependencies
pub fn create_app<S, I>(
    app_state: web::Data<AppState<S, I>>,
    cors_config: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SecretStore + 'static,
    I: IdentityStore + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(json_config)
        // Outermost last: every request gets a span, CORS answers preflights before routing
        .wrap(create_cors(cors_config))
        .wrap(TracingLogger::default())
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .route("/verify-otp", web::post().to(verify_otp::<S, I>))
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Liveness text for `GET /`
async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(ROOT_MESSAGE)
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "otp-verifier",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
