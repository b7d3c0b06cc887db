use rust_decimal::Decimal;
use serde::Deserialize;

use shoplist_core::{DomainResult, NewItem, QuantityAdjustment};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /shopping-list/{customer}` body.
///
/// Missing fields fall through to domain validation so an absent name gets
/// the same answer as an empty one.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
}

impl CreateItemRequest {
    pub fn into_new_item(self) -> DomainResult<NewItem> {
        NewItem::new(self.name, self.quantity, self.price)
    }
}

/// `PATCH`/`PUT /shopping-list/{customer}` body. `quantity` is a signed delta.
#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
}

impl AdjustQuantityRequest {
    pub fn into_adjustment(self) -> DomainResult<QuantityAdjustment> {
        QuantityAdjustment::new(self.name, self.quantity)
    }
}

/// `DELETE /shopping-list/{customer}?name=...` query.
#[derive(Debug, Deserialize)]
pub struct RemoveItemQuery {
    pub name: Option<String>,
}
