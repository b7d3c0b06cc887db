use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::Response,
};

use shoplist_core::Namespace;

use crate::app::errors;

/// Customer namespace for a request, taken from the `{customer}` path segment.
///
/// Validation happens during extraction, so a handler that receives a
/// `CustomerContext` never touches storage with an unchecked identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContext {
    namespace: Namespace,
}

impl CustomerContext {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CustomerContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_namespace",
                    "customer name is required",
                )
            })?;

        Namespace::parse(&raw)
            .map(Self::new)
            .map_err(errors::domain_error_to_response)
    }
}
