use actix_web::{web, HttpResponse};
use validator::Validate;

use ov_core::repositories::{IdentityStore, SecretStore};
use ov_shared::{error_codes, ErrorResponse};

use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::{handle_domain_error, internal_error_response};

use super::AppState;

/// Handler for POST /verify-otp
///
/// Verifies the code sent to an email address, consumes it and marks the
/// account's email as confirmed.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "otp": "482193"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Email verified successfully"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing email or otp, malformed body, or expired code
/// - 401 Unauthorized: Code does not match
/// - 404 Not Found: No outstanding code, or no account for the email
/// - 409 Conflict: A concurrent request redeemed the code first
/// - 500 Internal Server Error: Store unavailable
pub async fn verify_otp<S, I>(
    state: web::Data<AppState<S, I>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: SecretStore + 'static,
    I: IdentityStore + 'static,
{
    // Validate request data
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::BAD_REQUEST, "Email and OTP are required")
                .add_detail("validation_errors", errors),
        );
    }

    let VerifyOtpRequest { email, otp } = request.into_inner();
    let service = state.verification_service.clone();

    // Runs detached so a client disconnect cannot stop it between consume and confirm
    let outcome = tokio::spawn(async move { service.verify(&email, &otp).await }).await;

    match outcome {
        Ok(Ok(_)) => HttpResponse::Ok().json(VerifyOtpResponse::verified()),
        Ok(Err(error)) => handle_domain_error(&error),
        Err(join_error) => {
            tracing::error!(error = %join_error, "Verification task failed");
            internal_error_response()
        }
    }
}
