// Active listing retrieval — shop lookup plus offset pagination.
//
// Etsy v3 addresses shops by numeric id, but people know shops by the name
// in the shop URL. Names are resolved through the shop search endpoint
// (exact, case-insensitive match) before listings are paged through.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::client::EtsyClient;
use super::error::FetchError;

/// Maximum page size accepted by the listings endpoint.
pub const PAGE_LIMIT: usize = 100;

/// Which listing fields feed into term analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingField {
    Title,
    Description,
    Tags,
}

/// Title and description: what the tool has always analyzed.
pub const DEFAULT_FIELDS: [ListingField; 2] = [ListingField::Title, ListingField::Description];

/// The parts of an Etsy listing this crate reads.
///
/// Listings for unavailable items can come back without a title or
/// description, so every text field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub listing_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Listing {
    /// The text of the selected fields, in field order. Each tag is its own
    /// fragment.
    pub fn text_fragments(&self, fields: &[ListingField]) -> Vec<&str> {
        let mut fragments = Vec::new();
        for field in fields {
            match field {
                ListingField::Title => fragments.extend(self.title.as_deref()),
                ListingField::Description => fragments.extend(self.description.as_deref()),
                ListingField::Tags => {
                    fragments.extend(self.tags.iter().flatten().map(String::as_str))
                }
            }
        }
        fragments
    }
}

/// One page of `shops/{shop_id}/listings/active`.
#[derive(Debug, Deserialize)]
pub struct ListingsPage {
    /// Total active listings for the shop, across all pages.
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<Listing>,
}

/// Response from the `shops?shop_name=` search endpoint.
#[derive(Debug, Deserialize)]
pub struct ShopSearchResponse {
    /// Total matches for the search, which may exceed `results.len()`.
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<ShopSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopSummary {
    pub shop_id: u64,
    pub shop_name: String,
}

/// Extract a shop name from user input.
///
/// Accepts a bare name, or a pasted shop URL such as
/// `https://www.etsy.com/shop/OxAndPine?ref=shop_sugg`.
pub fn parse_shop_input(input: &str) -> &str {
    let input = input.trim();
    match input.split_once("/shop/") {
        Some((_, rest)) => rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .trim(),
        None => input,
    }
}

/// Pick the shop whose name matches exactly (ignoring case).
///
/// The search endpoint is fuzzy, so "Oak" can return "OakAndPine";
/// only an exact name counts as found.
pub fn find_exact_shop(results: &[ShopSummary], name: &str) -> Option<u64> {
    results
        .iter()
        .find(|s| s.shop_name.eq_ignore_ascii_case(name))
        .map(|s| s.shop_id)
}

/// Whether the search reported more matches than it returned.
pub fn search_truncated(response: &ShopSearchResponse) -> bool {
    response
        .count
        .is_some_and(|count| count > response.results.len() as u64)
}

/// Whether another page should be requested after receiving `received`
/// listings, with `fetched` collected so far and `total` reported by the API.
pub fn has_more_pages(received: usize, fetched: u64, total: Option<u64>) -> bool {
    if received < PAGE_LIMIT {
        return false;
    }
    match total {
        Some(total) => fetched < total,
        None => true,
    }
}

/// Resolve a shop name (or numeric id) to its numeric shop id.
pub async fn resolve_shop_id(client: &EtsyClient, shop: &str) -> Result<u64, FetchError> {
    if let Ok(id) = shop.parse::<u64>() {
        return Ok(id);
    }

    // Search matches are fuzzy; request the largest page the endpoint allows.
    let response: ShopSearchResponse = client
        .get_json(
            "shops",
            &[
                ("shop_name", shop.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ],
            shop,
        )
        .await?;

    let Some(id) = find_exact_shop(&response.results, shop) else {
        if search_truncated(&response) {
            warn!(
                shop = shop,
                matches = response.count,
                returned = response.results.len(),
                "Shop search returned a partial page without an exact match"
            );
        }
        return Err(FetchError::ShopNotFound {
            shop: shop.to_string(),
        });
    };

    debug!(shop = shop, shop_id = id, "Resolved shop name");
    Ok(id)
}

/// Fetch every active listing for a shop, following pagination until
/// exhausted.
pub async fn fetch_active_listings(
    client: &EtsyClient,
    shop: &str,
) -> Result<Vec<Listing>, FetchError> {
    let shop_id = resolve_shop_id(client, shop).await?;
    let path = format!("shops/{shop_id}/listings/active");

    let mut listings = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let page: ListingsPage = client
            .get_json(
                &path,
                &[
                    ("limit", PAGE_LIMIT.to_string()),
                    ("offset", offset.to_string()),
                ],
                shop,
            )
            .await?;

        let received = page.results.len();
        offset += received as u64;
        listings.extend(page.results);

        debug!(
            page_listings = received,
            total_collected = listings.len(),
            reported_total = page.count,
            "Fetched page of listings for {}",
            shop
        );

        if !has_more_pages(received, offset, page.count) {
            break;
        }
    }

    info!(count = listings.len(), shop = shop, "Collected active listings");

    Ok(listings)
}
