//! # Fieldtrace Infrastructure
//!
//! Infrastructure implementations behind the Fieldtrace domain.
//!
//! This crate contains:
//! - Configuration loading (env vars with file fallback)
//! - The authenticated HTTP request pipeline
//! - Key-value persistence (in-memory and file-backed)
//! - Auth and tracking services
//!
//! ## Architecture
//! - Depends on `fieldtrace-domain` for pure types
//! - Contains all "impure" code (I/O, clocks, randomness)
//! - Seams are `async_trait` objects so services can be tested against
//!   in-memory fakes

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod storage;
pub mod tracking;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, StoredTokenProvider, TokenProvider};
pub use auth::{AuthService, LoginOutcome};
pub use http::HttpClient;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tracking::{FixedPositionProvider, GeolocationProvider, LocationError, TrackingService};
