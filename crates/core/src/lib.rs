//! Saltline Core - Shared domain types.
//!
//! This crate provides the types used across all Saltline components:
//! - `catalog` - Catalog access boundary (fetching and caching products)
//! - `bundles` - Promotional bundle pricing and variant selection engine
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no caching. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money, normalized product/variant records, and cart request
//!   descriptors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
