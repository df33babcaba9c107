//! Middleware applied around the API router.

pub mod cors;
pub mod error;
pub mod logging;
