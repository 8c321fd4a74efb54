//! # Logging
//!
//! `tracing` setup for the client: a daily-rotated file under `logs/`,
//! filtered by `RUST_LOG`, optionally mirrored to stdout.

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init;
