//! External capabilities consumed by the runtime.
//!
//! The state engine never talks to the network or to disk directly. It
//! receives these services as trait objects, so tests can swap in doubles
//! implementing the same traits.

mod favorites;
mod http;
mod kv;
mod source;

pub use favorites::{FavoritesClient, KeyValueFavorites, FAVORITES_KEY};
pub use http::PokeApiSource;
pub use kv::{FileStore, KeyValueStore, MemoryStore, UpdateFn};
pub use source::CreatureSource;
