//! Favorites capability backed by a key-value store.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::model::CreatureId;

use super::kv::KeyValueStore;

/// Key under which favorite ids are persisted.
pub const FAVORITES_KEY: &str = "favorites";

/// Persisted set of favorite creature ids.
///
/// Both operations are infallible from the caller's side; implementations
/// absorb their own storage errors.
#[async_trait]
pub trait FavoritesClient: Send + Sync {
    /// Current set of favorite ids.
    async fn fetch_favorite_ids(&self) -> HashSet<CreatureId>;

    /// Flip membership of `id`: present becomes absent and vice versa.
    async fn toggle_favorite(&self, id: CreatureId);
}

/// [`FavoritesClient`] persisting ids as a JSON array under [`FAVORITES_KEY`].
///
/// Store errors are logged and swallowed: a failed read yields the empty
/// set, a failed write leaves the stored set unchanged.
///
/// Toggles go through [`KeyValueStore::update`], so concurrent toggles from
/// several clients sharing one store are never lost.
pub struct KeyValueFavorites {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueFavorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FavoritesClient for KeyValueFavorites {
    async fn fetch_favorite_ids(&self) -> HashSet<CreatureId> {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || read_ids(store.as_ref())).await {
            Ok(Ok(ids)) => ids,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Failed to read favorites, using empty set");
                HashSet::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Favorites read task failed, using empty set");
                HashSet::new()
            }
        }
    }

    async fn toggle_favorite(&self, id: CreatureId) {
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || toggle_id(store.as_ref(), id)).await;

        match outcome {
            Ok(Ok(is_favorite)) => {
                tracing::debug!(id, is_favorite, "Favorite toggled");
            }
            Ok(Err(err)) => {
                tracing::warn!(id, error = %err, "Failed to toggle favorite");
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "Favorite toggle task failed");
            }
        }
    }
}

fn read_ids(store: &dyn KeyValueStore) -> Result<HashSet<CreatureId>, StoreError> {
    decode_ids(store.load(FAVORITES_KEY)?)
}

fn decode_ids(value: Option<Value>) -> Result<HashSet<CreatureId>, StoreError> {
    let Some(value) = value else {
        return Ok(HashSet::new());
    };

    let ids: Vec<CreatureId> = serde_json::from_value(value).map_err(|e| StoreError::Decode {
        key: FAVORITES_KEY.to_string(),
        source: e,
    })?;
    Ok(ids.into_iter().collect())
}

/// Returns whether `id` is a favorite after the toggle.
fn toggle_id(store: &dyn KeyValueStore, id: CreatureId) -> Result<bool, StoreError> {
    let mut is_favorite = false;
    store.update(FAVORITES_KEY, &mut |current| {
        let mut ids = decode_ids(current)?;
        is_favorite = if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        };

        // Sorted so the stored document is stable across runs.
        let mut sorted: Vec<CreatureId> = ids.into_iter().collect();
        sorted.sort_unstable();
        serde_json::to_value(sorted).map_err(|e| StoreError::Serialize {
            key: FAVORITES_KEY.to_string(),
            source: e,
        })
    })?;
    Ok(is_favorite)
}
