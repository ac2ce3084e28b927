//! Geolocation provider seam
//!
//! The platform position source is an external collaborator; services only
//! see this trait.

use async_trait::async_trait;
use fieldtrace_domain::{Coordinates, FieldtraceError};
use thiserror::Error;

/// Failures producing a position fix.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    /// Location permission not granted; recoverable by re-prompting.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not produce a fix.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

impl From<LocationError> for FieldtraceError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => Self::PermissionDenied,
            LocationError::PositionUnavailable(message) => Self::PositionUnavailable(message),
        }
    }
}

/// Source of geographic fixes.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Prompt for (or re-check) location permission.
    async fn request_permission(&self) -> Result<bool, LocationError>;

    /// Produce the current coordinates.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// [`GeolocationProvider`] returning a preconfigured fix.
///
/// Used by the CLI (coordinates from flags/env) and by tests.
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    coords: Option<Coordinates>,
    granted: bool,
}

impl FixedPositionProvider {
    /// Provider with permission granted and a fix at `coords`.
    pub fn new(coords: Coordinates) -> Self {
        Self { coords: Some(coords), granted: true }
    }

    /// Provider with permission granted but no fix available.
    pub fn unavailable() -> Self {
        Self { coords: None, granted: true }
    }

    /// Provider with permission denied.
    pub fn denied() -> Self {
        Self { coords: None, granted: false }
    }
}

#[async_trait]
impl GeolocationProvider for FixedPositionProvider {
    async fn request_permission(&self) -> Result<bool, LocationError> {
        Ok(self.granted)
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.granted {
            return Err(LocationError::PermissionDenied);
        }
        self.coords
            .ok_or_else(|| LocationError::PositionUnavailable("no fix available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_provider_returns_its_coordinates() {
        let provider = FixedPositionProvider::new(Coordinates { latitude: 41.0, longitude: 29.0 });
        assert!(provider.request_permission().await.unwrap());
        let coords = provider.current_position().await.unwrap();
        assert_eq!(coords.latitude, 41.0);
        assert_eq!(coords.longitude, 29.0);
    }

    #[tokio::test]
    async fn denied_provider_reports_denied() {
        let provider = FixedPositionProvider::denied();
        assert!(!provider.request_permission().await.unwrap());
        assert!(matches!(
            provider.current_position().await,
            Err(LocationError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn unavailable_provider_cannot_fix() {
        let provider = FixedPositionProvider::unavailable();
        assert!(provider.request_permission().await.unwrap());
        assert!(matches!(
            provider.current_position().await,
            Err(LocationError::PositionUnavailable(_))
        ));
    }
}
