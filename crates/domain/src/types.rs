//! Common data types used throughout the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic fix produced by the geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One check-in or check-out payload.
///
/// Immutable once constructed; successive records carry no relationship at
/// this layer. The wire shape matches the `/save-location` endpoint exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock time, `HH:MM:SS`.
    pub time: String,
}

impl LocationRecord {
    /// Build a record from a fix and a timestamp.
    pub fn new(device_id: impl Into<String>, coords: Coordinates, at: DateTime<Utc>) -> Self {
        Self {
            device_id: device_id.into(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Login request body for the `/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub user_name: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user_name: user_name.into(), password: password.into() }
    }
}

/// Envelope returned by the `/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Envelope returned by the `/save-location` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveLocationEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveLocationEnvelope {
    /// Server-provided failure text, preferring `message` over `error`.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Request was not successful".to_string())
    }
}

/// Authentication state machine: two states, no refresh or concurrent
/// sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// The two states of the location-tracking toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    CheckedOut,
    CheckedIn,
}

impl TrackingState {
    pub fn is_checked_in(self) -> bool {
        matches!(self, Self::CheckedIn)
    }

    /// Persisted string form of the toggle (`"true"` when checked in).
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::CheckedIn => "true",
            Self::CheckedOut => "false",
        }
    }

    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("true") => Self::CheckedIn,
            _ => Self::CheckedOut,
        }
    }
}

/// Coarse device class used in the generated device identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Phone,
    Tablet,
    Desktop,
    Tv,
    #[default]
    Unknown,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Tv => "tv",
            Self::Unknown => "unknown",
        }
    }
}

/// Device metadata folded into the generated identifier.
///
/// Not a security boundary; collisions are merely "extremely unlikely".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    #[serde(default = "DeviceProfile::default_brand")]
    pub brand: String,
    #[serde(default = "DeviceProfile::default_model")]
    pub model: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub kind: DeviceKind,
}

impl DeviceProfile {
    fn default_brand() -> String {
        "unknown".to_string()
    }

    fn default_model() -> String {
        "device".to_string()
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            brand: Self::default_brand(),
            model: Self::default_model(),
            os_version: String::new(),
            kind: DeviceKind::Unknown,
        }
    }
}
