//! Presentation state: intents, reducers and the states they produce.
//!
//! Nothing here renders. Views observe [`list::ListState`] and send intents.

pub mod detail;
pub mod list;
pub mod mvi;
