//! # Backend API Client Module
//!
//! Typed wrappers for the marketplace REST API.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs           - Module exports and documentation
//! ├── client.rs        - ApiClient struct and MarketApi implementation
//! ├── auth.rs          - Login, registration, profile, passwords, OAuth
//! └── request_item.rs  - Wanted requests, comments, favorites, reports
//! ```

pub mod auth;
pub mod client;
pub mod request_item;

pub use auth::OAuthProvider;
pub use client::ApiClient;
