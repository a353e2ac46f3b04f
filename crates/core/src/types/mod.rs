//! Core types for EcoStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;

pub use id::*;
pub use money::{cart_total, charge_amount, format_total};
pub use order::{OrderLineItem, OrderRecord, concatenated_names, line_items};
pub use payment::{PayPalPayer, PaymentMethod, PaymentMethodPayload, PaymentPayloadError};
pub use product::Product;
