//! Keeps an open detail consistent with the annotated list view.

use crate::model::Creature;

use super::state::DetailState;

/// Reconcile the detail sub-state against a freshly annotated view.
///
/// An absent detail stays absent. A present detail whose id is still in the
/// view takes the annotated copy; one whose id disappeared is left as is.
pub fn reconcile(view: &[Creature], detail: Option<DetailState>) -> Option<DetailState> {
    let detail = detail?;
    match view.iter().find(|creature| creature.id == detail.id()) {
        Some(updated) => Some(DetailState::new(updated.clone())),
        None => {
            tracing::trace!(id = detail.id(), "Detail not in view, keeping stale copy");
            Some(detail)
        }
    }
}
