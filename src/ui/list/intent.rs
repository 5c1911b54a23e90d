//! Intents for the paginated creature list.

use std::collections::HashSet;

use crate::model::{Creature, CreatureId};
use crate::ui::detail::DetailIntent;
use crate::ui::mvi::Intent;

/// Intents that can be dispatched to the list reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ListIntent {
    /// The user reached the end of the list, load the next page.
    RequestNextPage,

    /// A page fetch completed.
    PageFetched { creatures: Vec<Creature> },

    /// A page fetch failed at the transport level.
    PageFailed { reason: String },

    /// The favorites set was (re-)read for the given snapshot of the list.
    FavoritesRefreshed {
        favorites: HashSet<CreatureId>,
        snapshot: Vec<Creature>,
    },

    /// Flip the favorite status of a creature.
    ToggleFavorite { id: CreatureId },

    /// Open the detail for a creature.
    SelectCreature { creature: Creature },

    /// Open the detail for a creature by id, resolved against the list.
    SelectById { id: CreatureId },

    /// Re-read the favorites store over the current list.
    RefreshFavorites,

    /// An intent raised from inside the open detail.
    Detail(DetailIntent),
}

impl Intent for ListIntent {}
