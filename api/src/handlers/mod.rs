//! Error-to-response mapping

pub mod error;

pub use error::*;
