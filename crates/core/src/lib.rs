//! `courier-core` — message approval domain.
//!
//! This crate contains **pure domain** primitives (no locks, no IO): item
//! identity, the review status state machine and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod item;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, RecipientId};
pub use item::{Item, ItemStatus, NewItem};
