// Shop listing aggregation — the glue between the listing source and the
// term analyzer.
//
// `analyze_shop` handles one shop and propagates its FetchError unchanged.
// `analyze_shops` runs a batch and isolates failures: a shop that can't be
// fetched becomes a failed outcome and the rest of the batch carries on.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::AnalysisSettings;
use crate::etsy::error::FetchError;
use crate::etsy::traits::ListingSource;
use crate::terms::analyzer::{count_terms, TermFrequency};

/// The analysis result for one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopReport {
    pub shop: String,
    /// Active listings that were analyzed
    pub listing_count: usize,
    /// Distinct qualifying terms across those listings
    pub distinct_terms: usize,
    /// Qualifying term occurrences across those listings
    pub total_terms: u64,
    /// Highest-count terms, at most `top_n` of them
    pub top_terms: Vec<TermFrequency>,
}

/// What happened to one shop in a batch.
#[derive(Debug, Clone)]
pub struct ShopOutcome {
    pub shop: String,
    pub result: Result<ShopReport, FetchError>,
}

impl ShopOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fetch a shop's active listings and rank the terms in the selected fields.
pub async fn analyze_shop<S: ListingSource + ?Sized>(
    source: &S,
    shop: &str,
    settings: &AnalysisSettings,
) -> Result<ShopReport, FetchError> {
    let listings = source.fetch_active_listings(shop).await?;

    let texts: Vec<&str> = listings
        .iter()
        .flat_map(|listing| listing.text_fragments(&settings.fields))
        .collect();

    let counts = count_terms(&texts, &settings.stop_words);
    let top_terms = counts.top(settings.top_n);

    info!(
        shop = shop,
        listings = listings.len(),
        distinct_terms = counts.len(),
        total_terms = counts.total(),
        top_term = top_terms.first().map(|t| t.term.as_str()),
        "Analyzed shop"
    );

    Ok(ShopReport {
        shop: shop.to_string(),
        listing_count: listings.len(),
        distinct_terms: counts.len(),
        total_terms: counts.total(),
        top_terms,
    })
}

/// Analyze a batch of shops, up to `concurrency` at a time.
///
/// Outcomes come back in the same order as `shops`. A failed shop never
/// cancels or aborts the others. `concurrency` of 0 is treated as 1.
pub async fn analyze_shops<S: ListingSource + ?Sized>(
    source: &S,
    shops: &[String],
    settings: &AnalysisSettings,
    concurrency: usize,
) -> Vec<ShopOutcome> {
    let pb = ProgressBar::new(shops.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Shops [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let outcomes: Vec<ShopOutcome> = stream::iter(shops.iter().map(|shop| {
        let pb = &pb;
        async move {
            pb.set_message(shop.clone());
            let result = analyze_shop(source, shop, settings).await;
            if let Err(e) = &result {
                warn!(shop = shop.as_str(), error = %e, "Failed to analyze shop, skipping");
            }
            pb.inc(1);
            ShopOutcome {
                shop: shop.clone(),
                result,
            }
        }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    pb.finish_and_clear();

    outcomes
}
