//! State for the detail sub-view.

use crate::model::{Creature, CreatureId};

/// The currently open creature.
///
/// Holds a copy of the selected creature; the copy is replaced whenever the
/// list view is re-annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub creature: Creature,
}

impl DetailState {
    pub fn new(creature: Creature) -> Self {
        Self { creature }
    }

    pub fn id(&self) -> CreatureId {
        self.creature.id
    }
}
