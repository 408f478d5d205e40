//! MediCart Core - Shared types library.
//!
//! This crate provides common types used across all MediCart client components:
//! - `client` - SDK for the MediCart API gateway
//! - `cli` - Command-line front end for browsing, cart, and admin tasks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no file
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
