//! Remote API pipeline
//!
//! Request construction, authorization-header injection, timeout
//! enforcement, and response/error normalization. Domain services call this
//! instead of the transport so they all share one failure contract.

mod client;
mod errors;
mod token;

pub use client::ApiClient;
pub use errors::ApiError;
pub use token::{StoredTokenProvider, TokenProvider};
