use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};

use ov_core::errors::DomainError;
use ov_shared::{error_codes, ErrorResponse};

/// HTTP status and stable error code for a domain error
pub fn status_and_code(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::BadRequest { .. } => (StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST),
        DomainError::NotFound => (StatusCode::NOT_FOUND, error_codes::OTP_NOT_FOUND),
        DomainError::Expired => (StatusCode::BAD_REQUEST, error_codes::OTP_EXPIRED),
        DomainError::InvalidCode => (StatusCode::UNAUTHORIZED, error_codes::INVALID_CODE),
        DomainError::AlreadyConsumed => (StatusCode::CONFLICT, error_codes::OTP_ALREADY_CONSUMED),
        DomainError::AccountNotFound => (StatusCode::NOT_FOUND, error_codes::ACCOUNT_NOT_FOUND),
        DomainError::Transient { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::STORE_UNAVAILABLE)
        }
        DomainError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Store and internal failure details are logged but never sent to the client.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code) = status_and_code(error);

    let message = match error {
        DomainError::NotFound => "No valid OTP found for this email. Please request a new code".to_string(),
        DomainError::Expired => "OTP has expired. Please request a new code".to_string(),
        DomainError::InvalidCode => "Invalid OTP. Please try again".to_string(),
        DomainError::AlreadyConsumed => "OTP has already been used. Please request a new code".to_string(),
        DomainError::AccountNotFound => "No account found for this email".to_string(),
        DomainError::Transient { message } => {
            tracing::error!(error = %message, "Store failure during verification");
            "Verification is temporarily unavailable. Please try again later".to_string()
        }
        DomainError::Internal { message } => {
            tracing::error!(error = %message, "Internal failure during verification");
            "An internal error occurred".to_string()
        }
        DomainError::BadRequest { .. } => error.to_string(),
    };

    let mut response = ErrorResponse::new(code, message);
    if let DomainError::BadRequest { field } = error {
        response = response.add_detail("field", field);
    }

    HttpResponse::build(status).json(response)
}

/// Internal error response for failures outside the domain (e.g. a panicked task)
pub fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    ))
}

/// Turn malformed JSON bodies into the standard 400 error response
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %error, "Rejected request body");
    let response = HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::BAD_REQUEST, "Request body must be a JSON object with email and otp")
            .add_detail("reason", error.to_string()),
    );
    actix_web::error::InternalError::from_response(error, response).into()
}
