//! Core types shared across the client: errors and service traits.

pub mod error;
pub mod service;

pub use error::{ClientError, Result};
pub use service::MarketApi;
