//! Bearer token lookup for outbound requests
//!
//! The pipeline never owns the token; it consults a provider on every
//! request so login/logout take effect immediately.

use std::sync::Arc;

use async_trait::async_trait;
use fieldtrace_domain::constants::storage_keys;

use crate::storage::{KeyValueStore, StorageError};

/// Trait for providing the stored bearer token, if any.
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token; `Ok(None)` when the user has never logged in.
    async fn token(&self) -> Result<Option<String>, StorageError>;
}

/// [`TokenProvider`] reading the token from the key-value store.
pub struct StoredTokenProvider {
    store: Arc<dyn KeyValueStore>,
}

impl StoredTokenProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(storage_keys::AUTH_TOKEN).await
    }
}
