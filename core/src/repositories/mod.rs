pub mod identity;
pub mod secret;

pub use identity::{IdentityStore, MockIdentityStore};
pub use secret::{MockSecretStore, SecretStore};
