//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the marketplace client and the
//! backend REST API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, registration, profile and password DTOs
//!   - **[`dto::request_item`]**: "Wanted" request listings, comments and reports
//!   - **[`dto::common`]**: Pagination, message and error envelopes
//!
//! ## Wire Format
//!
//! - Account DTOs keep the backend's snake_case names (`created_at`, `student_id`)
//! - Password and listing bodies use camelCase (`newPassword`, `categoryId`)
//! - Optional fields are omitted from JSON when `None`
//!
//! ## Usage in the Client
//!
//! ```rust,ignore
//! use shared::dto::auth::{LoginRequest, AuthResponse};
//!
//! # async fn run() -> Result<(), reqwest::Error> {
//! let request = LoginRequest {
//!     username: "alice".to_string(),
//!     password: "secret".to_string(),
//! };
//!
//! let response: AuthResponse = reqwest::Client::new()
//!     .post("http://127.0.0.1:5000/api/auth/login")
//!     .json(&request)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dto;

pub use dto::*;
