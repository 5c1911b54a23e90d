use std::sync::Arc;

use crate::capability::{CreatureSource, FavoritesClient};
use crate::ui::list::{ListEffect, ListIntent};

/// Executes list effects against the injected capabilities.
pub struct EffectRunner {
    source: Arc<dyn CreatureSource>,
    favorites: Arc<dyn FavoritesClient>,
}

impl EffectRunner {
    pub fn new(source: Arc<dyn CreatureSource>, favorites: Arc<dyn FavoritesClient>) -> Self {
        Self { source, favorites }
    }

    /// Run one effect and return the intent carrying its outcome.
    ///
    /// Transport failures are converted into [`ListIntent::PageFailed`];
    /// nothing escapes this boundary as an error.
    pub async fn run(&self, effect: ListEffect) -> ListIntent {
        match effect {
            ListEffect::FetchPage { offset, limit } => {
                match self.source.fetch_page(offset, limit).await {
                    Ok(creatures) => {
                        tracing::debug!(offset, count = creatures.len(), "Page fetched");
                        ListIntent::PageFetched { creatures }
                    }
                    Err(err) => {
                        tracing::warn!(offset, limit, error = %err, "Page fetch failed");
                        ListIntent::PageFailed {
                            reason: err.to_string(),
                        }
                    }
                }
            }
            ListEffect::RefreshFavorites { snapshot } => {
                let favorites = self.favorites.fetch_favorite_ids().await;
                ListIntent::FavoritesRefreshed {
                    favorites,
                    snapshot,
                }
            }
            ListEffect::ToggleFavorite { id, snapshot } => {
                // Write strictly before the read that re-derives favorite state.
                self.favorites.toggle_favorite(id).await;
                let favorites = self.favorites.fetch_favorite_ids().await;
                ListIntent::FavoritesRefreshed {
                    favorites,
                    snapshot,
                }
            }
        }
    }
}
