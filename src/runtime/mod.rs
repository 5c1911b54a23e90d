//! Effect scheduling and state ownership.
//!
//! ```text
//! StoreHandle ──intent──→ Store ──reduce──→ ListState ──watch──→ observers
//!                           │  ↑
//!                    effect │  │ result intent
//!                           ↓  │
//!                        EffectRunner ──→ capabilities
//! ```
//!
//! The store task is the single owner of the list state. Intents are
//! reduced one at a time; effects run on their own tasks and re-enter the
//! store as intents.

mod effects;
mod store;

pub use effects::EffectRunner;
pub use store::{RuntimeError, Store, StoreHandle, StoreSnapshot};
