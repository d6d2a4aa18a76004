//! Domain entities owned by the external stores.

pub mod identity_account;
pub mod otp_record;


pub use identity_account::IdentityAccount;
pub use otp_record::{NewOtpRecord, OtpRecord};
