//! EcoStore Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod bus;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod confirm;
pub mod error;
pub mod nav;
pub mod routes;
pub mod state;
pub mod storage;
pub mod theme;
