//! Authentication and session state

mod service;

pub use service::{AuthService, LoginOutcome};
