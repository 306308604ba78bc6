//! HTTP API: server wiring, routing, and error responses.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
