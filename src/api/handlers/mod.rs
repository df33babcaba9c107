//! HTTP handlers for API endpoints.

pub mod coin;
pub mod health;
pub mod users;
