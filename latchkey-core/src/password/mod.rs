//! Password lifecycle
//!
//! The secret is a fixed-length run of digit bytes in persistent storage.
//! Control is the only side that ever writes or reads it.

pub mod lifecycle;
pub mod policy;
pub mod secret;
pub mod store;

pub use lifecycle::{create, verify, Creation};
pub use policy::{LockoutPolicy, Verdict};
pub use secret::{Secret, PASSWORD_LEN};
pub use store::SecretStore;
