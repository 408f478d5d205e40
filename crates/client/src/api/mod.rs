//! Per-domain facades over the gateway request pipeline.
//!
//! Each module defines the wire types for one gateway domain and extends
//! [`GatewayClient`](crate::gateway::GatewayClient) with typed calls against
//! fixed routes. The facades stay thin: route construction, query-parameter
//! encoding, and session bookkeeping; everything else (auth headers, logging,
//! error classification) happens in the pipeline.

pub mod addresses;
pub mod auth;
pub mod batches;
pub mod cart;
pub mod medicines;
pub mod prescriptions;

pub use addresses::AddressDto;
pub use auth::{
    AuthSession, LoginResponse, MessageResponse, OtpSendResponse, OtpVerifyOutcome,
    RegisterRequest, UpdateProfileRequest, UserDto, VerifyOtpRequest,
};
pub use batches::{BatchDto, BatchTable, ExpiryStatus};
pub use cart::CartItemDto;
pub use medicines::MedicineDto;
pub use prescriptions::{PrescriptionDto, UploadResponse};
