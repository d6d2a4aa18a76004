use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /verify-otp`
///
/// Missing fields deserialize to empty strings so they surface as validation
/// errors rather than JSON parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
}

impl VerifyOtpResponse {
    pub fn verified() -> Self {
        Self {
            success: true,
            message: "Email verified successfully".to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
