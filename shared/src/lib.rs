//! Shared types for the Omega platform
//!
//! Common types used across crates: domain models, the unified error type,
//! the API response envelope, and time/id utilities.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult};
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
