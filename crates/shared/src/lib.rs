//! Shared utilities and common types for the GearGuard backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT token utilities
//! - One-time-password generation and hashing
//! - Common validation logic

pub mod jwt;
pub mod otp;
pub mod password;
pub mod validation;
