//! Unidirectional data flow primitives.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ observers
//!    ↑          │
//!    │          └──→ Effect ──→ runtime (capability calls)
//!    │                              │
//!    └──────── result intent ───────┘
//! ```
//!
//! A reducer is the only place a state changes. It never performs I/O:
//! asynchronous work is returned as an effect description, and its outcome
//! comes back later as another intent.

/// Snapshot of presentation state.
///
/// Cloned to hand out snapshots and compared to detect no-op transitions.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}

/// Something that happened: a user action or the outcome of an effect.
pub trait Intent: Send + 'static {}

/// Description of asynchronous work a transition asks for.
pub trait Effect: Send + 'static {}

/// Pure transition function `(State, Intent) -> (State, Option<Effect>)`.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;
    type Effect: Effect;

    /// Apply `intent` to `state`. At most one effect is requested per call.
    fn reduce(state: Self::State, intent: Self::Intent) -> (Self::State, Option<Self::Effect>);
}
