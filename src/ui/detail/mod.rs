mod intent;
mod state;
mod sync;

pub use intent::DetailIntent;
pub use state::DetailState;
pub use sync::reconcile;
