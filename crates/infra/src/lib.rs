//! Infrastructure layer: Tenant Item Store backends, DB pool, config.

pub mod config;
pub mod db;
pub mod shopping_list;

pub use config::{AppConfig, ConfigError, DatabaseConfig, StoreBackend};
pub use shopping_list::{
    InMemoryShoppingListStore, PostgresShoppingListStore, ShoppingListStore, StoreError,
};
