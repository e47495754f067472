//! External calendar integration and task/event aggregation.
//!
//! # Responsibility
//! - Define the gateway contract for the platform calendar.
//! - Enforce access and validation before calendar writes.
//! - Merge scheduled tasks and calendar events into one timeline.
//!
//! # Invariants
//! - Nothing here caches events; every read goes to the gateway.

pub mod aggregator;
pub mod gateway;
pub mod service;
