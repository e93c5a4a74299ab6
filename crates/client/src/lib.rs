//! `stockpad-client`
//!
//! **Responsibility:** talk to the inventory backend on behalf of one signed-in
//! individual.
//!
//! This crate provides:
//! - Identity flows (sign-up, sign-in, local logout)
//! - Category and customer resource clients with a last-call status slot
//! - SQLite-backed durable session storage
//! - An application context wiring it all to one shared session
//!
//! The API remains the authority; the client only caches what it last saw.

pub mod app;
pub mod category;
pub mod config;
pub mod customer;
pub mod dto;
pub mod error;
pub mod events;
pub mod http;
pub mod identity;
pub mod status;
pub mod storage;

pub use app::AppContext;
pub use category::CategoryClient;
pub use config::ClientConfig;
pub use customer::CustomerClient;
pub use dto::{Credentials, SignUpForm};
pub use error::{ApiError, ClientError, ClientResult};
pub use events::{ClientEvent, EventBus, Notification, NotificationLevel};
pub use http::ApiClient;
pub use identity::IdentityClient;
pub use status::OperationStatus;
pub use storage::SqliteStorage;
