//! Domain layer for the GearGuard backend.
//!
//! This crate contains:
//! - Domain models (maintenance requests, equipment, users, catalog records)
//! - Business logic services (allocation workflow, notifications, naming)
//! - Domain error types

pub mod models;
pub mod services;
