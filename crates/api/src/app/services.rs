use std::sync::Arc;

use anyhow::Context;

use shoplist_infra::{
    db, InMemoryShoppingListStore, PostgresShoppingListStore, ShoppingListStore, StoreBackend,
};

/// Shared services handed to every request.
///
/// The store is owned here and passed explicitly into the router; there is no
/// ambient global state.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ShoppingListStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ShoppingListStore>) -> Self {
        Self { store }
    }

    /// Services backed by a fresh in-memory store (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryShoppingListStore::new()))
    }

    pub fn store(&self) -> &dyn ShoppingListStore {
        self.store.as_ref()
    }
}

/// Wire up the configured store backend.
///
/// For Postgres this connects the pool and creates the tables if needed, so a
/// misconfigured database fails start-up instead of the first request.
pub async fn build_services(backend: &StoreBackend) -> anyhow::Result<AppServices> {
    match backend {
        StoreBackend::InMemory => {
            tracing::warn!("using in-memory shopping list store; data is lost on restart");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres(db_config) => {
            let pool = db::create_pool(db_config)
                .await
                .with_context(|| {
                    format!(
                        "failed to connect to postgres at {}:{}",
                        db_config.host, db_config.port
                    )
                })?;

            let store = PostgresShoppingListStore::new(pool);
            store
                .init_schema()
                .await
                .context("failed to initialise shopping list schema")?;

            tracing::info!(
                host = %db_config.host,
                port = db_config.port,
                database = %db_config.database,
                "connected to postgres shopping list store"
            );
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
