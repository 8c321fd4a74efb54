//! # Campus Market Client - Library Root
//!
//! Client SDK for the campus second-hand marketplace backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              market-client (this crate)                │
//! ├────────────────────────────────────────────────────────┤
//! │  store     - Session state, token persistence          │
//! │  api       - Typed REST wrappers (auth, requests)      │
//! │  http      - reqwest client, retry, batch, logging     │
//! │  notify    - Toasts and loading overlays               │
//! └────────────────────────────────────────────────────────┘
//!          │
//!          │ HTTP (JSON, Bearer token)
//!          ▼
//! ┌─────────────────┐
//! │  Backend API    │
//! │  (/api/...)     │
//! └─────────────────┘
//! ```
//!
//! Formatting and validation helpers that need no I/O live in `lib-utils`;
//! request/response DTOs live in `shared`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use market_client::{app::MarketApp, config::ClientConfig};
//! use shared::LoginRequest;
//!
//! # async fn run() -> market_client::Result<()> {
//! let app = MarketApp::from_config(&ClientConfig::from_env()?)?;
//! let credentials = LoginRequest { username: "alice".into(), password: "secret1".into() };
//! let user = app.session.login(&credentials).await?;
//! app.notifications.success(format!("欢迎回来，{}", user.username));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod notify;
pub mod services;
pub mod store;
pub mod utils;

pub use crate::core::error::{ClientError, Result};
