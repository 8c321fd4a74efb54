//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with the marketplace backend.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login, registration, profile and password management
//! - [`request_item`] - Wanted requests, comments, reports and contact info
//! - [`common`] - Pagination, plain message responses and error bodies
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {
//!   "username": "alice",
//!   "password": "MyPassword123"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "user": {
//!     "id": "1",
//!     "username": "alice",
//!     "nickname": "Alice",
//!     "role": "user",
//!     ...
//!   }
//! }
//! ```

pub mod auth;
pub mod common;
pub mod request_item;

pub use auth::*;
pub use common::*;
pub use request_item::*;
