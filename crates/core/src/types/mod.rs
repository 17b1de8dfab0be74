//! Core types for Yumbox.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod actor;
pub mod id;
pub mod money;

pub use actor::{Actor, Role};
pub use id::*;
pub use money::{AmountError, parse_amount, parse_whole_amount};
