use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shoplist_core::DomainError;
use shoplist_infra::StoreError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidNamespace(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_namespace", msg)
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        e @ StoreError::NamespaceMissing(_) => server_error("namespace_missing", e),
        e @ StoreError::Conflict(_) => server_error("conflict", e),
        e @ StoreError::Database(_) => server_error("store_error", e),
        e @ StoreError::Decode(_) => server_error("decode_error", e),
    }
}

fn server_error(code: &'static str, err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, code, "store operation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
