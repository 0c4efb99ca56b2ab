//! Authentication module — credential file, roles, and sign-up

pub mod types;
pub mod store;
pub mod actor;

pub use actor::{hash_password, AuthActor, AuthHandle};
pub use store::CredentialStore;
pub use types::{CredentialEntry, CredentialFile, PasswordScheme, Role};
