//! HTTP API: route groups, middleware and OpenAPI docs.

pub mod docs;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
