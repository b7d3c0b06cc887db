use axum::{routing::get, Router};

pub mod shopping_list;
pub mod system;

/// Router for all customer-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route(
            "/shopping-list/:customer",
            get(shopping_list::list_items)
                .post(shopping_list::create_item)
                .patch(shopping_list::adjust_quantity)
                .put(shopping_list::adjust_quantity)
                .delete(shopping_list::remove_item),
        )
        .route("/shopping-list", axum::routing::any(shopping_list::missing_customer))
        .route("/shopping-list/", axum::routing::any(shopping_list::missing_customer))
}
