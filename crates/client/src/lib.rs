//! MediCart Client - SDK for the MediCart API gateway.
//!
//! Everything the storefront and admin front ends need to talk to the
//! gateway: session persistence, bearer-token claims decoding, a logged and
//! classified request pipeline, per-domain API facades, and the cart
//! reconciliation store.
//!
//! # Architecture
//!
//! - [`session`] - Session repository (token, role, user id) with memory and
//!   file-backed stores
//! - [`token`] - Bearer-token claims codec (user identity extraction)
//! - [`log`] - Bounded request log with credential redaction
//! - [`gateway`] - The HTTP request pipeline every API call passes through
//! - [`api`] - Per-domain facades: auth/OTP, catalog, cart, batches,
//!   prescriptions, addresses
//! - [`cart`] - Cart reconciliation store (refresh-after-every-mutation)
//! - [`otp`] - OTP resend countdown state machine
//!
//! # Consistency model
//!
//! The cart store never updates optimistically: every mutation is followed by
//! a full refetch and a wholesale replacement of local state, so the server
//! stays the single source of truth. Concurrent mutations both proceed; the
//! last refresh to resolve wins.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod gateway;
pub mod log;
pub mod otp;
pub mod session;
pub mod token;

pub use cart::{CartItem, CartState, CartStatus, CartStore};
pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use gateway::GatewayClient;
pub use log::{LogEntry, LogFilter, LogLevel, RequestLog};
pub use otp::OtpCountdown;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
