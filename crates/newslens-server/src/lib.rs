//! HTTP server internals, exposed as a library for integration tests.

pub mod api;
pub mod config;
pub mod providers;
