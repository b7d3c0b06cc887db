use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CustomerContext;

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    customer: CustomerContext,
) -> axum::response::Response {
    match services.store().list_items(customer.namespace()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Create an item, or merge the quantity into an existing item of the same
/// name. Responds with the item as stored after the write.
pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    customer: CustomerContext,
    body: Result<Json<dto::CreateItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return invalid_body(e),
    };

    let new_item = match body.into_new_item() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().upsert_item(customer.namespace(), new_item).await {
        Ok(item) => {
            tracing::info!(
                namespace = %customer.namespace(),
                item_id = %item.id,
                quantity = item.quantity,
                "shopping list item stored"
            );
            (StatusCode::OK, Json(item)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn adjust_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    customer: CustomerContext,
    body: Result<Json<dto::AdjustQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return invalid_body(e),
    };

    let adjustment = match body.into_adjustment() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .store()
        .adjust_quantity(customer.namespace(), adjustment)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    customer: CustomerContext,
    Query(query): Query<dto::RemoveItemQuery>,
) -> axum::response::Response {
    let name = match query.name {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "query parameter `name` is required",
            );
        }
    };

    match services.store().remove_item(customer.namespace(), &name).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn missing_customer() -> axum::response::Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "invalid_namespace",
        "customer name is required",
    )
}

fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}
