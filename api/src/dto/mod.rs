//! Request and response payloads

pub mod otp_dto;

pub use otp_dto::*;
