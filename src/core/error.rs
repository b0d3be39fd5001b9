//! Typed error handling for the inventory engine
//!
//! Every failure the engine can report is a variant of [`InventoryError`].
//! The enum is matched exactly once, at the HTTP boundary, through its
//! [`IntoResponse`] implementation; nothing below the handlers knows about
//! status codes.
//!
//! # Error Categories
//!
//! - `InvalidRequest`: a query string or JSON body that does not deserialize
//! - `InvalidFilter`: no recognized filter, or an unknown comparison operation
//! - `InvalidQuantity`: a stock decrement that is not strictly positive
//! - `InsufficientStock`: a decrement the stored quantity cannot cover
//! - `NotFound`: replace-by-id on an id the store does not know
//! - `FileProcessing` / `UnsupportedFileType`: bulk import failures
//! - `Unexpected`: anything else, usually a store failure, wrapped with context
//!
//! # Example
//!
//! ```rust,ignore
//! match service.remove_socks(&payload).await {
//!     Ok(sock) => println!("{} left", sock.quantity),
//!     Err(InventoryError::InsufficientStock { available: Some(n), .. }) => {
//!         println!("only {} in stock", n);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::sock::SkuKey;

/// Error message listing the comparison operations the filter accepts
pub const INVALID_OPERATION_MESSAGE: &str =
    "Invalid operation. Please use 'greaterThan', 'lessThan' or 'equalTo'.";

/// Error message for a query that names no usable filter
pub const MISSING_FILTER_MESSAGE: &str = "At least one parameter (color, cottonPercentage, \
     cottonPercentageFrom or cottonPercentageTo) must be provided.";

/// The error type of the inventory engine
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    #[error("Invalid quantity {quantity}: must be greater than zero")]
    InvalidQuantity { quantity: i32 },

    /// `available` is `None` when no record matched the key at all
    #[error("{}", insufficient_stock_message(.color, .cotton_percentage, .requested, .available))]
    InsufficientStock {
        color: String,
        cotton_percentage: i32,
        requested: i32,
        available: Option<i32>,
    },

    #[error("Sock not found with id: {id}")]
    NotFound { id: i64 },

    #[error("Error processing file: {message}")]
    FileProcessing { message: String },

    #[error("Invalid file type '{file_name}'. Only CSV and Excel are supported.")]
    UnsupportedFileType { file_name: String },

    #[error("Failed to {operation}: {source}")]
    Unexpected {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

fn insufficient_stock_message(
    color: &str,
    cotton_percentage: &i32,
    requested: &i32,
    available: &Option<i32>,
) -> String {
    match available {
        Some(available) => format!(
            "Not enough socks in stock for color '{}' and cottonPercentage {}: available {}, requested {}",
            color, cotton_percentage, available, requested
        ),
        None => format!(
            "No socks found with color '{}' and cottonPercentage {}",
            color, cotton_percentage
        ),
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InventoryError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        InventoryError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        InventoryError::InvalidFilter {
            message: message.into(),
        }
    }

    pub fn invalid_operation() -> Self {
        Self::invalid_filter(INVALID_OPERATION_MESSAGE)
    }

    pub fn file_processing(message: impl Into<String>) -> Self {
        InventoryError::FileProcessing {
            message: message.into(),
        }
    }

    /// Stock missing entirely (`available = None`) or too low to cover `requested`
    pub fn insufficient_stock(key: &SkuKey, requested: i32, available: Option<i32>) -> Self {
        InventoryError::InsufficientStock {
            color: key.color.clone(),
            cotton_percentage: key.cotton_percentage,
            requested,
            available,
        }
    }

    /// Wrap a store failure with the operation that triggered it
    pub fn unexpected(operation: impl Into<String>, source: anyhow::Error) -> Self {
        InventoryError::Unexpected {
            operation: operation.into(),
            source,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InventoryError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            InventoryError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            InventoryError::InvalidQuantity { .. } => StatusCode::BAD_REQUEST,
            InventoryError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            InventoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            InventoryError::FileProcessing { .. } => StatusCode::BAD_REQUEST,
            InventoryError::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            InventoryError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InventoryError::InvalidRequest { .. } => "INVALID_REQUEST",
            InventoryError::InvalidFilter { .. } => "INVALID_FILTER",
            InventoryError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            InventoryError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            InventoryError::NotFound { .. } => "SOCK_NOT_FOUND",
            InventoryError::FileProcessing { .. } => "FILE_PROCESSING_ERROR",
            InventoryError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            InventoryError::Unexpected { .. } => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InventoryError::InsufficientStock {
                color,
                cotton_percentage,
                requested,
                available,
            } => Some(serde_json::json!({
                "color": color,
                "cottonPercentage": cotton_percentage,
                "requested": requested,
                "available": available,
            })),
            InventoryError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            _ => None,
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        if let InventoryError::Unexpected { .. } = &self {
            tracing::error!(error = %self, "request failed");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;
