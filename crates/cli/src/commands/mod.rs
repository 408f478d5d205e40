//! Command implementations, one module per gateway domain.

pub mod addresses;
pub mod auth;
pub mod batches;
pub mod cart;
pub mod catalog;
pub mod logs;
pub mod prescriptions;
