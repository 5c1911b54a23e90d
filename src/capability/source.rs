//! Remote list capability.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::model::Creature;

/// A paginated remote collection of creatures.
#[async_trait]
pub trait CreatureSource: Send + Sync {
    /// Fetch up to `limit` creatures starting at `offset`, in collection order.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Creature>, TransportError>;
}
