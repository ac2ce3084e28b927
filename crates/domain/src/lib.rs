//! # Fieldtrace Domain
//!
//! Pure types shared by every Fieldtrace crate: the wire and persisted data
//! shapes (`LocationRecord`, envelopes), the session and tracking state
//! machines, the unified [`FieldtraceError`] taxonomy, configuration
//! structures and the storage-key/demo-account constants.
//!
//! No I/O and no dependency on other Fieldtrace crates; everything impure
//! lives in `fieldtrace-infra`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
