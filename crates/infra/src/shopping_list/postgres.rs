//! Postgres-backed shopping list store.
//!
//! ## Layout
//!
//! Customer namespaces are rows in `shopping_list_namespaces`, not tables. All
//! items live in one `shopping_list_items` table keyed by `(namespace, name)`.
//! The namespace is always a bound parameter, so no statement is ever built by
//! string interpolation.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (check constraint violation) | `23514` | `Domain(Validation)` |
//! | Database (numeric value out of range) | `22003` | `Domain(Validation)` |
//! | Database (other) | Any other | `Database` |
//! | ColumnDecode / Decode | N/A | `Decode` |
//! | PoolClosed / PoolTimedOut / Io / other | N/A | `Database` |

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::{instrument, Span};

use shoplist_core::item::validate_name;
use shoplist_core::{DomainError, Item, ItemId, Namespace, NewItem, QuantityAdjustment};

use super::r#trait::{ShoppingListStore, StoreError};

const CREATE_NAMESPACES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS shopping_list_namespaces (
        namespace TEXT PRIMARY KEY CHECK (namespace ~ '^[A-Za-z0-9]+$'),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS shopping_list_items (
        id UUID PRIMARY KEY,
        namespace TEXT NOT NULL REFERENCES shopping_list_namespaces (namespace),
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity >= 1),
        price NUMERIC NOT NULL DEFAULT 0 CHECK (price >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT shopping_list_items_namespace_name_key UNIQUE (namespace, name)
    )
"#;

/// Postgres-backed Tenant Item Store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool; each statement borrows a connection and
/// returns it immediately. Nothing is held across requests.
///
/// ## Atomicity
///
/// The create-or-merge path is one `INSERT … ON CONFLICT … DO UPDATE` statement,
/// so two concurrent creates of the same new name end up as one row with both
/// quantities added. Namespace provisioning runs as a separate statement before
/// it; a failure in between leaves an empty namespace, which the next call
/// reuses.
#[derive(Debug, Clone)]
pub struct PostgresShoppingListStore {
    pool: Arc<PgPool>,
}

impl PostgresShoppingListStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the namespace registry and item tables if they do not exist.
    #[instrument(skip(self), err)]
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_NAMESPACES_TABLE, CREATE_ITEMS_TABLE] {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("init_schema", e))?;
        }
        Ok(())
    }

    async fn namespace_exists(&self, namespace: &Namespace) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM shopping_list_namespaces WHERE namespace = $1) AS present",
        )
        .bind(namespace.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("namespace_exists", e))?;

        row.try_get::<bool, _>("present")
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Zero rows affected means either the item or the whole namespace is gone.
    async fn missing(&self, namespace: &Namespace) -> StoreError {
        match self.namespace_exists(namespace).await {
            Ok(true) => StoreError::NotFound,
            Ok(false) => StoreError::NamespaceMissing(namespace.clone()),
            Err(e) => e,
        }
    }
}

#[async_trait::async_trait]
impl ShoppingListStore for PostgresShoppingListStore {
    #[instrument(skip(self), fields(namespace = %namespace), err)]
    async fn ensure_namespace(&self, namespace: &Namespace) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO shopping_list_namespaces (namespace)
            VALUES ($1)
            ON CONFLICT (namespace) DO NOTHING
            "#,
        )
        .bind(namespace.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_namespace", e))?;
        Ok(())
    }

    #[instrument(
        skip(self, item),
        fields(namespace = %namespace, name = %item.name(), quantity = item.quantity()),
        err
    )]
    async fn upsert_item(&self, namespace: &Namespace, item: NewItem) -> Result<Item, StoreError> {
        self.ensure_namespace(namespace).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO shopping_list_items (id, namespace, name, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (namespace, name)
            DO UPDATE SET quantity = shopping_list_items.quantity + EXCLUDED.quantity
            RETURNING id, name, quantity, price
            "#,
        )
        .bind(ItemId::new().as_uuid())
        .bind(namespace.as_str())
        .bind(item.name())
        .bind(item.quantity())
        .bind(item.price())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_item", e))?;

        let stored = ItemRow::from_row(&row)?.into_item();
        Span::current().record("quantity", stored.quantity);
        Ok(stored)
    }

    #[instrument(
        skip(self, adjustment),
        fields(namespace = %namespace, name = %adjustment.name(), delta = adjustment.delta()),
        err
    )]
    async fn adjust_quantity(
        &self,
        namespace: &Namespace,
        adjustment: QuantityAdjustment,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE shopping_list_items
            SET quantity = quantity + $3
            WHERE namespace = $1 AND name = $2
            "#,
        )
        .bind(namespace.as_str())
        .bind(adjustment.name())
        .bind(adjustment.delta())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("adjust_quantity", e))?;

        if result.rows_affected() == 0 {
            return Err(self.missing(namespace).await);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(namespace = %namespace, item_count = tracing::field::Empty), err)]
    async fn list_items(&self, namespace: &Namespace) -> Result<Vec<Item>, StoreError> {
        if !self.namespace_exists(namespace).await? {
            return Err(StoreError::NamespaceMissing(namespace.clone()));
        }

        let rows = sqlx::query(
            r#"
            SELECT id, name, quantity, price
            FROM shopping_list_items
            WHERE namespace = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(namespace.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ItemRow::from_row(&row)?.into_item());
        }

        Span::current().record("item_count", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(namespace = %namespace), err)]
    async fn remove_item(&self, namespace: &Namespace, name: &str) -> Result<(), StoreError> {
        let name = validate_name(name.to_string())?;

        let result = sqlx::query("DELETE FROM shopping_list_items WHERE namespace = $1 AND name = $2")
            .bind(namespace.as_str())
            .bind(&name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_item", e))?;

        if result.rows_affected() == 0 {
            return Err(self.missing(namespace).await);
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ItemRow {
    id: uuid::Uuid,
    name: String,
    quantity: i32,
    price: Decimal,
}

impl ItemRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());
        Ok(ItemRow {
            id: row.try_get("id").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            quantity: row.try_get("quantity").map_err(decode)?,
            price: row.try_get("price").map_err(decode)?,
        })
    }

    fn into_item(self) -> Item {
        Item {
            id: ItemId::from_uuid(self.id),
            name: self.name,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23514") => StoreError::Domain(DomainError::validation(
                    "quantity must stay at or above 1 and price cannot be negative",
                )),
                Some("22003") => StoreError::Domain(DomainError::validation("quantity out of range")),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Decode(format!("{}: {}", operation, err))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
