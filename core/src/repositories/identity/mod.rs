#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockIdentityStore;
pub use trait_::IdentityStore;
