//! EcoStore Core - Shared types library.
//!
//! This crate provides common types used across EcoStore components:
//! - `storefront` - Cart, checkout, and the JSON API surface
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients, no logging. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, products, money arithmetic, payment payloads,
//!   and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
