//! HTTP route handlers

pub mod cars;
pub mod docs;
pub mod health;
pub mod metrics;
