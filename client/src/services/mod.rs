//! Backend communication: the HTTP layer and the typed API on top of it.

pub mod api;
pub mod http;
