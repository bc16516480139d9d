use async_trait::async_trait;

use super::super::connections_errors::ConnectionError;
use super::super::connections_model::PluggyPosition;

/// Client contract for the external `pluggy` function. Implementations
/// talk to the aggregator on behalf of the user; the service layer only
/// sees this trait.
#[async_trait]
pub trait PluggyProvider: Send + Sync {
    /// Fetches the positions currently held under the item
    async fn fetch_positions(&self, item_id: &str)
        -> Result<Vec<PluggyPosition>, ConnectionError>;

    /// Deletes the item on the aggregator side
    async fn delete_item(&self, item_id: &str) -> Result<(), ConnectionError>;
}
