//! Check-in / check-out service
//!
//! One boolean toggle per session, restored from persisted storage at
//! startup. Check-in requires a fresh fix; check-out falls back to resending
//! the stored check-in record when a fresh fix cannot be produced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fieldtrace_domain::constants::storage_keys;
use fieldtrace_domain::{
    Coordinates, DeviceProfile, Endpoint, FieldtraceError, LocationRecord, Result,
    SaveLocationEnvelope, TrackingState,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::device;
use super::geolocation::{GeolocationProvider, LocationError};
use crate::api::ApiClient;
use crate::storage::KeyValueStore;

/// Location check-in/check-out over the request pipeline.
pub struct TrackingService {
    api: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
    geolocation: Arc<dyn GeolocationProvider>,
    profile: DeviceProfile,
    state: Mutex<TrackingState>,
}

impl TrackingService {
    pub fn new(
        api: Arc<ApiClient>,
        store: Arc<dyn KeyValueStore>,
        geolocation: Arc<dyn GeolocationProvider>,
        profile: DeviceProfile,
    ) -> Self {
        Self { api, store, geolocation, profile, state: Mutex::new(TrackingState::CheckedOut) }
    }

    /// Restore the toggle from the persisted flag at startup.
    ///
    /// A storage read failure starts the session checked-out.
    pub async fn restore(&self) -> TrackingState {
        let flag = match self.store.get(storage_keys::LOGIN_STATUS).await {
            Ok(flag) => flag,
            Err(err) => {
                warn!(error = %err, "tracking state restore failed, starting checked-out");
                None
            }
        };

        let mut state = self.state.lock().await;
        *state = TrackingState::from_flag(flag.as_deref());
        *state
    }

    pub async fn state(&self) -> TrackingState {
        *self.state.lock().await
    }

    /// The stable per-installation device identifier.
    pub async fn device_id(&self) -> String {
        device::device_id(self.store.as_ref(), &self.profile).await
    }

    /// Check in at the current position.
    ///
    /// Acquires a fix, POSTs the record, and only on an accepted response
    /// flips the toggle and persists the record. Any failure propagates and
    /// commits nothing.
    pub async fn check_in(&self) -> Result<LocationRecord> {
        self.check_in_at(Utc::now()).await
    }

    /// [`check_in`](Self::check_in) with an explicit timestamp.
    #[instrument(skip(self))]
    pub async fn check_in_at(&self, at: DateTime<Utc>) -> Result<LocationRecord> {
        let mut state = self.state.lock().await;

        let coords = self.acquire_position().await?;
        let record = LocationRecord::new(self.device_id().await, coords, at);

        self.submit(&record).await?;
        self.persist(storage_keys::LOGIN_RECORD, &record, TrackingState::CheckedIn).await;
        *state = TrackingState::CheckedIn;
        info!(device_id = %record.device_id, "checked in");
        Ok(record)
    }

    /// Check out, resending the stored check-in record when a fresh fix
    /// cannot be produced.
    ///
    /// # Errors
    ///
    /// Fails with the acquisition error when no fix is available and no
    /// prior check-in record exists; an empty payload is never sent.
    pub async fn check_out(&self) -> Result<LocationRecord> {
        self.check_out_at(Utc::now()).await
    }

    /// [`check_out`](Self::check_out) with an explicit timestamp.
    #[instrument(skip(self))]
    pub async fn check_out_at(&self, at: DateTime<Utc>) -> Result<LocationRecord> {
        let mut state = self.state.lock().await;

        let record = match self.acquire_position().await {
            Ok(coords) => LocationRecord::new(self.device_id().await, coords, at),
            Err(err) => {
                // Stale-resend policy: a check-out with the last known
                // coordinates beats no check-out at all.
                warn!(error = %err, "position fix failed, falling back to last check-in record");
                match self.fallback_record().await {
                    Some(prior) => prior,
                    None => return Err(err.into()),
                }
            }
        };

        self.submit(&record).await?;
        self.persist(storage_keys::LOGOUT_RECORD, &record, TrackingState::CheckedOut).await;
        *state = TrackingState::CheckedOut;
        info!(device_id = %record.device_id, "checked out");
        Ok(record)
    }

    /// Last accepted check-in record, if any.
    pub async fn last_check_in(&self) -> Result<Option<LocationRecord>> {
        self.stored_record(storage_keys::LOGIN_RECORD).await
    }

    /// Last accepted check-out record, if any.
    pub async fn last_check_out(&self) -> Result<Option<LocationRecord>> {
        self.stored_record(storage_keys::LOGOUT_RECORD).await
    }

    async fn acquire_position(&self) -> std::result::Result<Coordinates, LocationError> {
        if !self.geolocation.request_permission().await? {
            return Err(LocationError::PermissionDenied);
        }
        self.geolocation.current_position().await
    }

    async fn submit(&self, record: &LocationRecord) -> Result<()> {
        let envelope: SaveLocationEnvelope =
            self.api.post(Endpoint::SaveLocation, record).await?;
        if !envelope.success {
            return Err(FieldtraceError::Rejected(envelope.failure_message()));
        }
        Ok(())
    }

    /// Persist the record and the toggle flag. Failures here are logged,
    /// not surfaced: the server already accepted the record.
    async fn persist(&self, key: &str, record: &LocationRecord, new_state: TrackingState) {
        match serde_json::to_string(record) {
            Ok(json) => {
                if let Err(err) = self.store.set(key, &json).await {
                    warn!(error = %err, key, "failed to persist location record");
                }
            }
            Err(err) => warn!(error = %err, key, "failed to encode location record"),
        }
        if let Err(err) =
            self.store.set(storage_keys::LOGIN_STATUS, new_state.as_flag()).await
        {
            warn!(error = %err, "failed to persist tracking flag");
        }
    }

    async fn stored_record(&self, key: &str) -> Result<Option<LocationRecord>> {
        match self.store.get(key).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|err| FieldtraceError::Storage(err.to_string())),
            None => Ok(None),
        }
    }

    /// The stored check-in record for the stale-resend fallback; unreadable
    /// records count as absent.
    async fn fallback_record(&self) -> Option<LocationRecord> {
        match self.stored_record(storage_keys::LOGIN_RECORD).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "stored check-in record unreadable, no fallback");
                None
            }
        }
    }
}
