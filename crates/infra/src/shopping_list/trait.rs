use thiserror::Error;

use shoplist_core::{DomainError, Item, Namespace, NewItem, QuantityAdjustment};
use std::sync::Arc;

/// Failure of a Tenant Item Store operation.
///
/// The split matters to callers: `Domain` is the caller's fault, `NotFound`
/// means the namespace exists but the item does not, and everything else is a
/// storage fault. `NamespaceMissing` counts as a storage fault: reading or
/// deleting from a namespace that was never written to is not a missing item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("item not found")]
    NotFound,

    #[error("namespace {0} has not been provisioned")]
    NamespaceMissing(Namespace),

    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("failed to decode stored item: {0}")]
    Decode(String),
}

/// Tenant-isolated shopping list storage.
///
/// Every operation is scoped by a validated [`Namespace`]. A namespace is
/// provisioned lazily by the first write (`upsert_item`) and never dropped.
/// Reads and targeted writes against an unprovisioned namespace fail with
/// [`StoreError::NamespaceMissing`] instead of creating it.
#[async_trait::async_trait]
pub trait ShoppingListStore: Send + Sync {
    /// Provision storage for `namespace`. Idempotent.
    async fn ensure_namespace(&self, namespace: &Namespace) -> Result<(), StoreError>;

    /// Create an item, or merge into the existing item with the same name.
    ///
    /// A merge adds the requested quantity to the stored one and leaves id and
    /// price untouched. Returns the item as stored after the write.
    async fn upsert_item(&self, namespace: &Namespace, item: NewItem) -> Result<Item, StoreError>;

    /// Add a signed delta to an existing item's quantity.
    async fn adjust_quantity(
        &self,
        namespace: &Namespace,
        adjustment: QuantityAdjustment,
    ) -> Result<(), StoreError>;

    /// All items of a namespace, in insertion order.
    async fn list_items(&self, namespace: &Namespace) -> Result<Vec<Item>, StoreError>;

    /// Delete an item by name.
    async fn remove_item(&self, namespace: &Namespace, name: &str) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> ShoppingListStore for Arc<S>
where
    S: ShoppingListStore + ?Sized,
{
    async fn ensure_namespace(&self, namespace: &Namespace) -> Result<(), StoreError> {
        (**self).ensure_namespace(namespace).await
    }

    async fn upsert_item(&self, namespace: &Namespace, item: NewItem) -> Result<Item, StoreError> {
        (**self).upsert_item(namespace, item).await
    }

    async fn adjust_quantity(
        &self,
        namespace: &Namespace,
        adjustment: QuantityAdjustment,
    ) -> Result<(), StoreError> {
        (**self).adjust_quantity(namespace, adjustment).await
    }

    async fn list_items(&self, namespace: &Namespace) -> Result<Vec<Item>, StoreError> {
        (**self).list_items(namespace).await
    }

    async fn remove_item(&self, namespace: &Namespace, name: &str) -> Result<(), StoreError> {
        (**self).remove_item(namespace, name).await
    }
}
