//! HTTP middleware for request processing and protection.
//!
//! Provides admission control and observability middleware.

pub mod admission;
pub mod tracing;
