//! `shoplist-core` — shopping list domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! customer namespaces, item identity, and the validation rules applied before
//! anything reaches storage.

pub mod entity;
pub mod error;
pub mod id;
pub mod item;
pub mod namespace;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ItemId;
pub use item::{Item, NewItem, QuantityAdjustment};
pub use namespace::Namespace;
