//! Effects requested by the list reducer.

use crate::model::{Creature, CreatureId};
use crate::ui::mvi::Effect;

/// Asynchronous work the list reducer asks the runtime to perform.
///
/// Every effect resolves to exactly one follow-up [`ListIntent`].
///
/// [`ListIntent`]: super::ListIntent
#[derive(Debug, Clone, PartialEq)]
pub enum ListEffect {
    /// Fetch one page from the remote collection.
    FetchPage { offset: usize, limit: usize },

    /// Read the favorites set and annotate `snapshot`.
    RefreshFavorites { snapshot: Vec<Creature> },

    /// Toggle `id` in the favorites store, then read the set back and
    /// annotate `snapshot`.
    ///
    /// `snapshot` is the accumulated list when the toggle was requested. If
    /// a page lands while the toggle is in flight and its refresh is applied
    /// first, the view briefly shrinks back to this snapshot until the next
    /// refresh.
    ToggleFavorite {
        id: CreatureId,
        snapshot: Vec<Creature>,
    },
}

impl Effect for ListEffect {}

impl ListEffect {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FetchPage { .. } => "fetch_page",
            Self::RefreshFavorites { .. } => "refresh_favorites",
            Self::ToggleFavorite { .. } => "toggle_favorite",
        }
    }
}
