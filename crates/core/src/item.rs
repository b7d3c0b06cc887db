//! Shopping list items and the rules for creating and adjusting them.
//!
//! Lifecycle: `absent → created → merged (repeatable) → deleted`. The name is the
//! merge key inside a namespace; the id is assigned on first creation only and
//! the price is fixed at creation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::ItemId;

/// Quantity used when a create request asks for zero, a negative amount, or
/// nothing at all.
pub const DEFAULT_QUANTITY: i32 = 1;

/// A stored shopping list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl Item {
    /// Materialise a fresh item from a validated create request.
    pub fn create(id: ItemId, new: &NewItem) -> Self {
        Self {
            id,
            name: new.name.clone(),
            quantity: new.quantity,
            price: new.price,
        }
    }

    /// Merge a repeated create into this item: quantities add up, the price
    /// stays as first recorded.
    pub fn merge(&mut self, new: &NewItem) -> DomainResult<()> {
        self.quantity = self
            .quantity
            .checked_add(new.quantity)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        Ok(())
    }

    /// Apply a signed quantity change. The result must stay at or above one.
    pub fn adjust(&mut self, delta: i32) -> DomainResult<()> {
        let next = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        if next < DEFAULT_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity of {} cannot drop below {DEFAULT_QUANTITY} (current {}, delta {delta})",
                self.name, self.quantity
            )));
        }
        self.quantity = next;
        Ok(())
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Validated create request.
///
/// Construction normalises the quantity and rejects bad names and prices, so
/// every `NewItem` is safe to hand to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    quantity: i32,
    price: Decimal,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        quantity: Option<i32>,
        price: Option<Decimal>,
    ) -> DomainResult<Self> {
        let name = validate_name(name.into())?;

        let quantity = match quantity {
            Some(q) if q > 0 => q,
            _ => DEFAULT_QUANTITY,
        };

        let price = price.unwrap_or(Decimal::ZERO);
        if price < Decimal::ZERO {
            return Err(DomainError::validation("price cannot be negative"));
        }

        Ok(Self {
            name,
            quantity,
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// Validated quantity change for an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityAdjustment {
    name: String,
    delta: i32,
}

impl QuantityAdjustment {
    /// A zero delta is rejected: a no-op is not a valid request.
    pub fn new(name: impl Into<String>, delta: i32) -> DomainResult<Self> {
        let name = validate_name(name.into())?;
        if delta == 0 {
            return Err(DomainError::validation("quantity delta cannot be zero"));
        }
        Ok(Self { name, delta })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delta(&self) -> i32 {
        self.delta
    }
}

/// Item names must carry at least one non-whitespace character and no
/// control characters (NUL is not storable in a Postgres `TEXT` column).
pub fn validate_name(name: String) -> DomainResult<String> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("item name cannot be empty"));
    }
    if name.chars().any(char::is_control) {
        return Err(DomainError::validation(
            "item name cannot contain control characters",
        ));
    }
    Ok(name)
}
