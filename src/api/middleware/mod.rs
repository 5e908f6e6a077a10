//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Access log: sees every request, including rejected ones
//! 2. Auth validator: bearer token on mutating routes

pub mod audit;
pub mod auth;
