//! Domain constants shared across crates

/// Namespaced keys for the on-device key-value store.
///
/// One flat namespace; the store itself is opaque about content.
pub mod storage_keys {
    /// Opaque bearer token written on login, removed on logout.
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Stable per-installation device identifier.
    pub const DEVICE_ID: &str = "device_id";
    /// Check-in toggle flag, `"true"` / `"false"`.
    pub const LOGIN_STATUS: &str = "login_status";
    /// Last check-in record, JSON-encoded [`crate::LocationRecord`].
    pub const LOGIN_RECORD: &str = "login_record";
    /// Last check-out record, JSON-encoded [`crate::LocationRecord`].
    pub const LOGOUT_RECORD: &str = "logout_record";
}

/// Built-in demo account honored when the server is unreachable.
pub mod demo {
    pub const USER_NAME: &str = "demo";
    pub const PASSWORD: &str = "demo123";
    pub const TOKEN: &str = "demo_token";
}

/// Token stored when the login envelope reports success without a token.
pub const FALLBACK_TOKEN: &str = "authenticated";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default endpoint paths, keyed symbolically in the endpoint table.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SAVE_LOCATION_PATH: &str = "/save-location";
