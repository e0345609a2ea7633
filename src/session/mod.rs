//! Mock session layer: login/restore/logout against a seeded user
//! directory, persisted as an opaque unsigned token.
//!
//! The token format and the directory are explicitly mocks; the store's
//! contract is what the rest of the service depends on, so a real identity
//! provider can replace both without touching consumers.

pub mod storage;
pub mod store;
pub mod token;
pub mod users;

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::{SessionError, SessionStore};
pub use token::SessionToken;
pub use users::{SeededUserDirectory, UserDirectory};
