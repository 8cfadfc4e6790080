//! HTTP entry points for the restaurant single sign-on service.
//!
//! The binary wires [`config::ServerConfig`] to PostgreSQL and Redis backends
//! and serves [`api::create_router`]. Tests build the same router over the
//! in-memory backends.

pub mod api;
pub mod config;
pub mod logging;
