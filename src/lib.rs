//! Paginated creature browser with persisted favorites.
//!
//! The crate is organised around a single state engine:
//!
//! - [`ui::list`] reduces intents into list state and effect descriptions
//! - [`ui::detail`] keeps the open detail consistent with the list
//! - [`runtime`] owns the state and executes effects on tokio
//! - [`capability`] holds the remote collection and favorites services

pub mod capability;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod ui;
