//! Creature records and their favorite annotation.

use serde::{Deserialize, Serialize};

/// Stable identifier of a creature in the remote collection.
pub type CreatureId = u32;

/// Favorite status of a creature.
///
/// Creatures arrive from the remote collection as `Unknown` and only become
/// `Favorite`/`NotFavorite` once reconciled with the favorites store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FavoriteStatus {
    #[default]
    Unknown,
    Favorite,
    NotFavorite,
}

impl FavoriteStatus {
    pub fn from_flag(is_favorite: bool) -> Self {
        if is_favorite {
            Self::Favorite
        } else {
            Self::NotFavorite
        }
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, Self::Favorite)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A single item of the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    /// Opaque reference to an external image. Never fetched here.
    pub image_ref: String,
    #[serde(default)]
    pub favorite: FavoriteStatus,
}

impl Creature {
    pub fn new(
        id: CreatureId,
        name: impl Into<String>,
        height: u32,
        weight: u32,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            height,
            weight,
            image_ref: image_ref.into(),
            favorite: FavoriteStatus::Unknown,
        }
    }

    /// Returns a copy annotated with the given favorite flag.
    pub fn with_favorite(&self, is_favorite: bool) -> Self {
        Self {
            favorite: FavoriteStatus::from_flag(is_favorite),
            ..self.clone()
        }
    }

    /// Icon name used by presentation layers for the favorite toggle.
    pub fn favorite_icon(&self) -> &'static str {
        if self.favorite.is_favorite() {
            "star.fill"
        } else {
            "star"
        }
    }
}
