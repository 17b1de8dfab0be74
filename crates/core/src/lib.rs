//! Yumbox Core - Shared types library.
//!
//! This crate provides common types used across all Yumbox admin components:
//! - `admin` - Dashboard backend for moderators and admins
//! - `integration-tests` - Cross-crate tests
//!
//! # Architecture
//!
//! The core crate contains only types and parsing helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money amounts, and actors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
