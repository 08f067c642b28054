// Colored terminal output for shop term rankings.
//
// main.rs prints prompts and status lines itself; anything that renders a
// ShopReport or a fetch failure lives here.

use colored::Colorize;

use crate::etsy::error::{FetchError, FetchErrorKind};
use crate::pipeline::shops::{ShopOutcome, ShopReport};
use crate::terms::stop_words::StopWordSet;

/// Display every outcome of a batch, in order.
pub fn display_outcomes(outcomes: &[ShopOutcome], verbose: bool) {
    for outcome in outcomes {
        display_outcome(outcome, verbose);
    }
}

/// Display one shop's ranking, or why it couldn't be produced.
pub fn display_outcome(outcome: &ShopOutcome, verbose: bool) {
    match &outcome.result {
        Ok(report) => display_report(report, verbose),
        Err(err) => display_failure(&outcome.shop, err),
    }
}

/// Display a shop's top terms as a ranked table.
///
/// With `verbose`, also show how many distinct terms and term occurrences
/// the ranking was drawn from.
pub fn display_report(report: &ShopReport, verbose: bool) {
    println!(
        "\n{}",
        format!(
            "Top {} terms for {} ({} active listings)",
            report.top_terms.len(),
            report.shop,
            report.listing_count
        )
        .bold()
    );
    if verbose {
        println!("  {}", term_totals(report).dimmed());
    }

    if report.top_terms.is_empty() {
        println!("  {}", "No qualifying terms found.".dimmed());
        return;
    }

    for (i, term) in report.top_terms.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:>6}",
            i + 1,
            term.term,
            term.count.to_string().cyan()
        );
    }
}

/// `"412 distinct terms, 1893 occurrences"`
pub fn term_totals(report: &ShopReport) -> String {
    format!(
        "{} distinct terms, {} occurrences",
        report.distinct_terms, report.total_terms
    )
}

/// Display a fetch failure with a hint about what to do next.
pub fn display_failure(shop: &str, err: &FetchError) {
    let kind = err.kind();
    let headline = match kind {
        FetchErrorKind::ShopNotFound => format!("Sorry! We can't find {shop}"),
        _ => format!("Could not analyze {shop}: {kind}"),
    };
    println!("\n{}", headline.red().bold());
    if kind != FetchErrorKind::ShopNotFound {
        println!("  {}", err.to_string().dimmed());
    }
    println!("  {}", kind.hint().yellow());
}

/// One-line summary after a batch.
pub fn display_batch_summary(outcomes: &[ShopOutcome]) {
    let ok = outcomes.iter().filter(|o| o.is_ok()).count();
    let failed = outcomes.len() - ok;
    if failed == 0 {
        println!("\n{}", format!("Analyzed {ok} shops.").bold());
    } else {
        println!(
            "\n{} {}",
            format!("Analyzed {ok} of {} shops;", outcomes.len()).bold(),
            format!("{failed} failed.").red()
        );
    }
}

/// Print the effective stop-word set in columns.
pub fn display_stop_words(stop_words: &StopWordSet) {
    println!(
        "\n{}",
        format!("=== Stop words ({}) ===", stop_words.len()).bold()
    );
    for row in stop_words.sorted().chunks(8) {
        let line: Vec<String> = row.iter().map(|w| format!("{w:<12}")).collect();
        println!("  {}", line.join("").trim_end());
    }
}
