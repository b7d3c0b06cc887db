//! Tenant Item Store: per-customer shopping lists.
//!
//! This module defines the storage boundary for shopping list items plus the
//! in-memory (tests/dev) and Postgres (production) implementations.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryShoppingListStore;
pub use postgres::PostgresShoppingListStore;
pub use r#trait::{ShoppingListStore, StoreError};
