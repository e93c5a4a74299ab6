//! `stockpad-core` — typed records exchanged with the inventory backend.
//!
//! This crate contains **pure data** (no HTTP, no storage).

pub mod category;
pub mod customer;
pub mod entity;
pub mod error;
pub mod id;

pub use category::Category;
pub use customer::{Customer, CustomerDraft};
pub use entity::{Entity, Individual};
pub use error::{CoreError, CoreResult};
pub use id::{CategoryId, CustomerUuid, EntityId, IndividualId};
