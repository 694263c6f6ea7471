//! Unified error type for the Omega platform
//!
//! Every Core entry point returns [`AppResult`] instead of a boolean success
//! flag. The variants cover the financial taxonomy (sale input, unknown
//! member, overdraft, illegal transitions, storage outage) plus the ambient
//! kinds the API layer needs.
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication / permission errors
//! - 2xxx: Member errors
//! - 3xxx: Wallet / points errors
//! - 4xxx: Order / lifecycle errors
//! - 5xxx: Sale / commission errors
//! - 9xxx: System errors

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::response::ApiResponse;

/// Unified error type for the platform
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed commission inputs (negative price, out-of-range rate)
    #[error("Invalid sale input: {message}")]
    InvalidSaleInput { message: String },

    /// Referenced member id does not exist
    #[error("Unknown member: {member_id}")]
    UnknownMember { member_id: String },

    /// Debit beyond the member's wallet balance
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    /// Redemption beyond the member's point balance
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: i64 },

    /// Illegal order or activation status change
    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String },

    /// Storage backend I/O failure (transient; caller decides on retry)
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// Request payload validation failure
    #[error("{message}")]
    Validation { message: String },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Resource already exists
    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    /// Business rule violation (e.g. withdrawals paused)
    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    /// Upstream collaborator failure (gateway, quoter, image host)
    #[error("Upstream service error: {message}")]
    Upstream { message: String },

    /// Internal server error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    // ========== Convenient constructors ==========

    pub fn invalid_sale_input(message: impl Into<String>) -> Self {
        Self::InvalidSaleInput {
            message: message.into(),
        }
    }

    pub fn unknown_member(member_id: impl Into<String>) -> Self {
        Self::UnknownMember {
            member_id: member_id.into(),
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            message: message.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // ========== Error inspection ==========

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E0002",
            Self::NotFound { .. } => "E0003",
            Self::Conflict { .. } => "E0004",
            Self::BusinessRule { .. } => "E0005",
            Self::Unauthorized => "E1001",
            Self::Forbidden { .. } => "E1002",
            Self::UnknownMember { .. } => "E2001",
            Self::InsufficientBalance { .. } => "E3001",
            Self::InsufficientPoints { .. } => "E3002",
            Self::InvalidTransition { .. } => "E4001",
            Self::InvalidSaleInput { .. } => "E5001",
            Self::Internal { .. } => "E9001",
            Self::StorageUnavailable { .. } => "E9002",
            Self::Upstream { .. } => "E9003",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidSaleInput { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } | Self::UnknownMember { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::BusinessRule { .. }
            | Self::InsufficientBalance { .. }
            | Self::InsufficientPoints { .. }
            | Self::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Transient errors are safe for the caller to retry when the operation
    /// is guarded by an idempotency key
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. } | Self::Upstream { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Serialization error: {err}"))
    }
}

/// Result type for platform operations
pub type AppResult<T> = Result<T, AppError>;
