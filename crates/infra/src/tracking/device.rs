//! Per-installation device identifier
//!
//! Derived once from device metadata plus a timestamp and random suffix,
//! then persisted. An opaque stable identifier, not a security token.

use chrono::Utc;
use fieldtrace_domain::constants::storage_keys;
use fieldtrace_domain::DeviceProfile;
use rand::Rng;
use tracing::warn;

use crate::storage::KeyValueStore;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Return the persisted device id, generating and persisting one on first
/// use.
///
/// Storage failures degrade to an ephemeral id rather than failing the
/// calling operation.
pub async fn device_id(store: &dyn KeyValueStore, profile: &DeviceProfile) -> String {
    match store.get(storage_keys::DEVICE_ID).await {
        Ok(Some(id)) => return id,
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "device id read failed, using ephemeral id");
            return generate(profile);
        }
    }

    let id = generate(profile);
    if let Err(err) = store.set(storage_keys::DEVICE_ID, &id).await {
        warn!(error = %err, "device id write failed, continuing with ephemeral id");
    }
    id
}

/// `<brand>_<model>_<os_version>_<kind>_<timestamp36><rand6>` with
/// whitespace collapsed to underscores.
fn generate(profile: &DeviceProfile) -> String {
    let signature = format!(
        "{}_{}_{}_{}",
        profile.brand,
        profile.model,
        profile.os_version,
        profile.kind.as_str()
    );
    let signature = signature.split_whitespace().collect::<Vec<_>>().join("_");

    let timestamp = to_base36(Utc::now().timestamp_millis().max(0) as u64);
    let suffix = random_suffix();

    format!("{}_{}{}", signature, timestamp, suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect()
}
