//! Intents originating from the detail view.

use crate::ui::mvi::Intent;

/// Intents raised inside an open detail.
///
/// These never mutate the detail locally. The list reducer routes them so
/// that favorite status has a single source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailIntent {
    /// User tapped the star in the detail toolbar.
    ToggleFavorite,
    /// Detail was dismissed or navigation popped.
    Dismiss,
}

impl Intent for DetailIntent {}
