//! Request extractors that reject with [`InventoryError`]
//!
//! axum's own `Json` and `Query` answer a malformed request with a plain-text
//! body. These wrappers keep every 400 in the `{code, message}` shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::core::error::InventoryError;

/// JSON request body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn register_income(
///     JsonBody(payload): JsonBody<SockPayload>,
/// ) -> InventoryResult<Json<MessageResponse>> {
///     // ...
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = InventoryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(InventoryError::invalid_request(rejection.body_text())),
        }
    }
}

/// URL query string
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = InventoryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(InventoryError::invalid_request(rejection.body_text())),
        }
    }
}
