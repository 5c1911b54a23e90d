//! State for the paginated creature list.

use serde::{Deserialize, Serialize};

use crate::model::{Creature, CreatureId};
use crate::ui::detail::DetailState;
use crate::ui::mvi::UiState;

/// Number of creatures requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// What a failed page fetch does to the pagination cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return to idle at the same offset so the next request retries.
    #[default]
    Retry,
    /// Treat the failure as an empty page and stop paginating.
    Exhaust,
}

/// Offset-based pagination cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub page_size: usize,
    /// Set once a page came back shorter than `page_size`.
    /// This is a guess at end-of-data and must match server behaviour.
    pub exhausted: bool,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            exhausted: false,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Phase derived from the loading and exhaustion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Exhausted,
}

/// Accumulated creatures, their annotated view and the open detail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListState {
    /// Raw fetch order, deduplicated by id, never annotated.
    pub(crate) accumulated: Vec<Creature>,
    /// `accumulated` annotated with favorite status at the last refresh.
    pub(crate) view: Vec<Creature>,
    pub(crate) pagination: Pagination,
    pub(crate) loading: bool,
    pub(crate) favorite_count: usize,
    pub(crate) detail: Option<DetailState>,
    pub(crate) last_error: Option<String>,
    pub(crate) failure_policy: FailurePolicy,
}

impl UiState for ListState {}

impl ListState {
    pub fn new(page_size: usize, failure_policy: FailurePolicy) -> Self {
        Self {
            pagination: Pagination::new(page_size),
            failure_policy,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> ListPhase {
        if self.loading {
            ListPhase::Loading
        } else if self.pagination.exhausted {
            ListPhase::Exhausted
        } else {
            ListPhase::Idle
        }
    }

    /// Favorite-annotated creatures, in fetch order.
    pub fn view(&self) -> &[Creature] {
        &self.view
    }

    /// Raw creatures, in fetch order.
    pub fn accumulated(&self) -> &[Creature] {
        &self.accumulated
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.pagination.exhausted
    }

    pub fn offset(&self) -> usize {
        self.pagination.offset
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn favorite_count(&self) -> usize {
        self.favorite_count
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    /// Reason of the last failed page fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Look up a creature in the annotated view.
    pub fn find(&self, id: CreatureId) -> Option<&Creature> {
        self.view.iter().find(|creature| creature.id == id)
    }
}
