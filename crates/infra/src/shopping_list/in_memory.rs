use std::collections::HashMap;
use std::sync::RwLock;

use shoplist_core::item::validate_name;
use shoplist_core::{Item, ItemId, Namespace, NewItem, QuantityAdjustment};

use super::r#trait::{ShoppingListStore, StoreError};

/// In-memory shopping list store.
///
/// Intended for tests/dev. Each namespace owns an insertion-ordered list of
/// items; a single lock makes every operation atomic, so concurrent creates of
/// the same name always merge.
#[derive(Debug, Default)]
pub struct InMemoryShoppingListStore {
    namespaces: RwLock<HashMap<Namespace, Vec<Item>>>,
}

impl InMemoryShoppingListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ShoppingListStore for InMemoryShoppingListStore {
    async fn ensure_namespace(&self, namespace: &Namespace) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        namespaces.entry(namespace.clone()).or_default();
        Ok(())
    }

    async fn upsert_item(&self, namespace: &Namespace, item: NewItem) -> Result<Item, StoreError> {
        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        let items = namespaces.entry(namespace.clone()).or_default();

        if let Some(existing) = items.iter_mut().find(|i| i.name == item.name()) {
            existing.merge(&item)?;
            return Ok(existing.clone());
        }

        let created = Item::create(ItemId::new(), &item);
        items.push(created.clone());
        Ok(created)
    }

    async fn adjust_quantity(
        &self,
        namespace: &Namespace,
        adjustment: QuantityAdjustment,
    ) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        let items = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::NamespaceMissing(namespace.clone()))?;

        let existing = items
            .iter_mut()
            .find(|i| i.name == adjustment.name())
            .ok_or(StoreError::NotFound)?;
        existing.adjust(adjustment.delta())?;
        Ok(())
    }

    async fn list_items(&self, namespace: &Namespace) -> Result<Vec<Item>, StoreError> {
        let namespaces = self.namespaces.read().map_err(poisoned)?;
        namespaces
            .get(namespace)
            .cloned()
            .ok_or_else(|| StoreError::NamespaceMissing(namespace.clone()))
    }

    async fn remove_item(&self, namespace: &Namespace, name: &str) -> Result<(), StoreError> {
        let name = validate_name(name.to_string())?;

        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        let items = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::NamespaceMissing(namespace.clone()))?;

        let before = items.len();
        items.retain(|i| i.name != name);
        if items.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
