mod effect;
mod intent;
mod reducer;
mod state;

pub use effect::ListEffect;
pub use intent::ListIntent;
pub use reducer::ListReducer;
pub use state::{FailurePolicy, ListPhase, ListState, Pagination, DEFAULT_PAGE_SIZE};
