// Listing source trait — the seam between fetching and analysis.
//
// The pipeline only needs "give me this shop's active listings". Putting
// that behind a trait lets tests run the whole aggregation without network
// access.

use async_trait::async_trait;

use super::client::EtsyClient;
use super::error::FetchError;
use super::listings::{self, Listing};

/// Anything that can produce the active listings of a shop.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch all active listings for `shop`, following pagination.
    async fn fetch_active_listings(&self, shop: &str) -> Result<Vec<Listing>, FetchError>;
}

#[async_trait]
impl ListingSource for EtsyClient {
    async fn fetch_active_listings(&self, shop: &str) -> Result<Vec<Listing>, FetchError> {
        listings::fetch_active_listings(self, shop).await
    }
}
