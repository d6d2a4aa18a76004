#[path = "trait.rs"]
mod trait_;
pub mod mock;


pub use mock::MockSecretStore;
pub use trait_::SecretStore;
