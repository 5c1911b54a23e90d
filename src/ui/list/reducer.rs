//! Reducer for the paginated creature list.

use std::collections::HashSet;

use crate::model::{Creature, CreatureId};
use crate::ui::detail::{reconcile, DetailIntent, DetailState};
use crate::ui::mvi::Reducer;

use super::effect::ListEffect;
use super::intent::ListIntent;
use super::state::{FailurePolicy, ListState};

/// Reducer for list pagination and favorite reconciliation.
///
/// Pure function: capability calls are described as [`ListEffect`]s and
/// executed by the runtime, which dispatches their results back here.
pub struct ListReducer;

impl Reducer for ListReducer {
    type State = ListState;
    type Intent = ListIntent;
    type Effect = ListEffect;

    fn reduce(state: Self::State, intent: Self::Intent) -> (Self::State, Option<Self::Effect>) {
        match intent {
            ListIntent::RequestNextPage => request_next_page(state),
            ListIntent::PageFetched { creatures } => page_fetched(state, creatures),
            ListIntent::PageFailed { reason } => page_failed(state, reason),
            ListIntent::FavoritesRefreshed {
                favorites,
                snapshot,
            } => (favorites_refreshed(state, &favorites, snapshot), None),
            ListIntent::ToggleFavorite { id } => {
                let effect = ListEffect::ToggleFavorite {
                    id,
                    snapshot: state.accumulated.clone(),
                };
                (state, Some(effect))
            }
            ListIntent::SelectCreature { creature } => {
                let mut state = state;
                state.detail = Some(DetailState::new(creature));
                (state, None)
            }
            ListIntent::SelectById { id } => (select_by_id(state, id), None),
            ListIntent::RefreshFavorites => {
                let effect = ListEffect::RefreshFavorites {
                    snapshot: state.accumulated.clone(),
                };
                (state, Some(effect))
            }
            ListIntent::Detail(detail_intent) => detail(state, detail_intent),
        }
    }
}

fn request_next_page(mut state: ListState) -> (ListState, Option<ListEffect>) {
    // One fetch at a time, and none once the collection looks exhausted.
    if state.loading || state.pagination.exhausted {
        tracing::trace!(phase = ?state.phase(), "Ignoring page request");
        return (state, None);
    }

    state.loading = true;
    let effect = ListEffect::FetchPage {
        offset: state.pagination.offset,
        limit: state.pagination.page_size,
    };
    (state, Some(effect))
}

fn page_fetched(mut state: ListState, creatures: Vec<Creature>) -> (ListState, Option<ListEffect>) {
    state.loading = false;
    state.last_error = None;

    if creatures.len() < state.pagination.page_size {
        state.pagination.exhausted = true;
    }
    state.pagination.offset += state.pagination.page_size;

    let mut seen: HashSet<CreatureId> = state.accumulated.iter().map(|c| c.id).collect();
    for creature in creatures {
        if seen.insert(creature.id) {
            state.accumulated.push(creature);
        }
    }

    let effect = ListEffect::RefreshFavorites {
        snapshot: state.accumulated.clone(),
    };
    (state, Some(effect))
}

fn page_failed(mut state: ListState, reason: String) -> (ListState, Option<ListEffect>) {
    match state.failure_policy {
        FailurePolicy::Retry => {
            state.loading = false;
            state.last_error = Some(reason);
            (state, None)
        }
        FailurePolicy::Exhaust => {
            let (mut state, effect) = page_fetched(state, Vec::new());
            state.last_error = Some(reason);
            (state, effect)
        }
    }
}

fn favorites_refreshed(
    mut state: ListState,
    favorites: &HashSet<CreatureId>,
    snapshot: Vec<Creature>,
) -> ListState {
    state.view = snapshot
        .iter()
        .map(|creature| creature.with_favorite(favorites.contains(&creature.id)))
        .collect();
    state.favorite_count = favorites.len();
    state.detail = reconcile(&state.view, state.detail.take());
    state
}

fn select_by_id(mut state: ListState, id: CreatureId) -> ListState {
    let found = state
        .view
        .iter()
        .find(|creature| creature.id == id)
        .or_else(|| state.accumulated.iter().find(|creature| creature.id == id))
        .cloned();

    if let Some(creature) = found {
        state.detail = Some(DetailState::new(creature));
    }
    state
}

fn detail(state: ListState, intent: DetailIntent) -> (ListState, Option<ListEffect>) {
    match intent {
        DetailIntent::ToggleFavorite => match state.detail.as_ref().map(DetailState::id) {
            Some(id) => ListReducer::reduce(state, ListIntent::ToggleFavorite { id }),
            None => (state, None),
        },
        DetailIntent::Dismiss => {
            let mut state = state;
            state.detail = None;
            (state, None)
        }
    }
}
