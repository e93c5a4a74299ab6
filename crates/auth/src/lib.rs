//! `stockpad-auth` — client-side session and navigation gate.
//!
//! This crate is intentionally decoupled from HTTP. Durable storage is reached
//! only through the [`SessionStorage`] trait.

pub mod gate;
pub mod session;
pub mod storage;
pub mod store;

pub use gate::{authorize_navigation, GateDecision, Route, PUBLIC_PATHS};
pub use session::{Authorization, Session, SessionError, SignedIn, Token};
pub use storage::{InMemoryStorage, SessionStorage, StorageError, StorageWrite};
pub use store::SessionStore;
