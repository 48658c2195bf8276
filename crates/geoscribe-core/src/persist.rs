//! Loading and saving the persisted subset of map state.
//!
//! Only the feature collection and layer visibility survive a restart. They
//! are stored under a single key as a versioned envelope:
//!
//! ```json
//! { "state": { "drawnFeatures": [...], "layers": {...} }, "version": 0 }
//! ```

use crate::feature::Feature;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::view::LayerVisibility;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default key for the persisted record.
pub const DEFAULT_STORAGE_KEY: &str = "map-storage";

/// Envelope version written by [`save`]. Other versions load as defaults.
pub const STATE_VERSION: u32 = 0;

/// The durable part of map state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub drawn_features: Vec<Feature>,
    #[serde(default)]
    pub layers: LayerVisibility,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: StateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateRef<'a> {
    drawn_features: &'a [Feature],
    layers: &'a LayerVisibility,
}

/// Encode the persisted subset as JSON.
pub fn encode(features: &[Feature], layers: &LayerVisibility) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        state: StateRef {
            drawn_features: features,
            layers,
        },
        version: STATE_VERSION,
    })
}

/// Decode a stored record.
pub fn decode(json: &str) -> StorageResult<PersistedState> {
    let envelope: Envelope =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    if envelope.version != STATE_VERSION {
        return Err(StorageError::Serialization(format!(
            "Unsupported state version {}",
            envelope.version
        )));
    }
    let mut seen = HashSet::with_capacity(envelope.state.drawn_features.len());
    if let Some(dup) = envelope.state.drawn_features.iter().find(|f| !seen.insert(f.id)) {
        return Err(StorageError::Serialization(format!(
            "Duplicate feature id {}",
            dup.id
        )));
    }
    Ok(envelope.state)
}

/// Read the record under `key`, reporting every failure.
///
/// Returns `Ok(None)` when nothing has been stored yet.
pub fn try_load<S: Storage + ?Sized>(storage: &S, key: &str) -> StorageResult<Option<PersistedState>> {
    match storage.read(key) {
        Ok(json) => decode(&json).map(Some),
        Err(StorageError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read the record under `key`, falling back to defaults.
///
/// Never fails: a missing, unreadable or malformed record yields
/// [`PersistedState::default`].
pub fn load<S: Storage + ?Sized>(storage: &S, key: &str) -> PersistedState {
    match try_load(storage, key) {
        Ok(Some(state)) => {
            log::info!(
                "Restored {} features from '{}'",
                state.drawn_features.len(),
                key
            );
            state
        }
        Ok(None) => {
            log::debug!("No persisted state under '{}', using defaults", key);
            PersistedState::default()
        }
        Err(e) => {
            log::warn!("Discarding persisted state under '{}': {}", key, e);
            PersistedState::default()
        }
    }
}

/// Write the persisted subset under `key`.
pub fn save<S: Storage + ?Sized>(
    storage: &S,
    key: &str,
    features: &[Feature],
    layers: &LayerVisibility,
) -> StorageResult<()> {
    let json = encode(features, layers).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.write(key, &json)
}
