//! Saudi Address Core - Shared types library.
//!
//! This crate provides the types used across all Saudi Address components:
//! - `service` - JSON lookup/verification service and national address client
//! - `cli` - Command-line lookups and connectivity checks
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows hosts to use it anywhere
//! they need to validate or persist a national address.
//!
//! # Modules
//!
//! - [`types`] - Language codes, lookup entries, address numbers and
//!   checkout field handling

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
