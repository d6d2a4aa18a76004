//! Domain layer containing the entities the verification protocol reads and updates.

pub mod entities;

pub use entities::*;
