use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use shopwords::config::{AnalysisConfig, Config};
use shopwords::etsy::client::EtsyClient;
use shopwords::etsy::error::FetchErrorKind;
use shopwords::etsy::listings::parse_shop_input;
use shopwords::output::terminal;
use shopwords::pipeline::shops::{analyze_shops, ShopOutcome};

const WELCOME_MESSAGE: &str = "Welcome to shopwords, the Etsy top terms finder. Press Enter to begin.";
const USER_PROMPT: &str = "Enter the name of an Etsy shop to analyze (or 'exit' to quit):";
const CONNECTION_ERROR_MESSAGE: &str =
    "It looks like you're offline. Reconnect to the internet and press Enter to try again.";
const RUNNING_ANALYSIS_MESSAGE: &str =
    "Running analysis... depending on your connection, this may take a moment.";

/// shopwords: the most frequent terms in Etsy shops' active listings.
///
/// Fetches every active listing of a shop, drops stop words, and ranks
/// what's left by frequency.
#[derive(Parser)]
#[command(name = "shopwords", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of shops to fetch in parallel (default: 1)
    #[arg(long, global = true, default_value = "1")]
    concurrency: usize,

    /// Analysis config file (JSON: stop_words, top_n, seed_shops, fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also show distinct and total term counts for each shop
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the seed shops, then prompt for more (the default)
    Interactive,

    /// Analyze the given shops and exit
    Analyze {
        /// Shop names as they appear in the shop URL (or the URLs themselves)
        #[arg(required = true)]
        shops: Vec<String>,
    },

    /// Analyze the seed shops and exit
    Seeds,

    /// Print the stop words in effect
    StopWords,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Warnings only by default so the interactive output stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shopwords=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let analysis_path = config.analysis_config_path(cli.config.as_deref());
    let analysis = AnalysisConfig::load(analysis_path.as_deref())
        .context("Failed to load analysis config")?;
    if let Some(path) = &analysis_path {
        info!(path = %path.display(), "Loaded analysis config");
    }

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::StopWords => {
            terminal::display_stop_words(&analysis.settings.stop_words);
        }

        Commands::Analyze { shops } => {
            let client = create_client(&config)?;
            let shops: Vec<String> = shops
                .iter()
                .map(|s| parse_shop_input(s).to_string())
                .filter(|s| !s.is_empty())
                .collect();

            println!("{RUNNING_ANALYSIS_MESSAGE}");
            let outcomes =
                analyze_shops(&client, &shops, &analysis.settings, cli.concurrency).await;
            terminal::display_outcomes(&outcomes, cli.verbose);
            terminal::display_batch_summary(&outcomes);
        }

        Commands::Seeds => {
            let client = create_client(&config)?;
            run_seed_batch(&client, &analysis, cli.concurrency, cli.verbose).await;
        }

        Commands::Interactive => {
            let client = create_client(&config)?;
            interactive(&client, &analysis, cli.concurrency, cli.verbose).await?;
        }
    }

    Ok(())
}

fn create_client(config: &Config) -> Result<EtsyClient> {
    config.require_api_key()?;
    EtsyClient::new(&config.api_url, &config.api_key)
}

/// Analyze and display the seed shops. Returns the outcomes so the caller
/// can decide whether the run looked offline.
async fn run_seed_batch(
    client: &EtsyClient,
    analysis: &AnalysisConfig,
    concurrency: usize,
    verbose: bool,
) -> Vec<ShopOutcome> {
    if analysis.seed_shops.is_empty() {
        println!("{}", "No seed shops configured.".dimmed());
        return Vec::new();
    }

    println!("{RUNNING_ANALYSIS_MESSAGE}");
    let outcomes = analyze_shops(
        client,
        &analysis.seed_shops,
        &analysis.settings,
        concurrency,
    )
    .await;
    terminal::display_outcomes(&outcomes, verbose);
    terminal::display_batch_summary(&outcomes);
    outcomes
}

/// True when every shop failed because the network was unreachable.
fn looks_offline(outcomes: &[ShopOutcome]) -> bool {
    !outcomes.is_empty()
        && outcomes.iter().all(|o| {
            matches!(&o.result, Err(e) if e.kind() == FetchErrorKind::Network)
        })
}

/// Prompt loop: seed shops first, then one shop at a time
/// until the user types `exit` or closes stdin.
async fn interactive(
    client: &EtsyClient,
    analysis: &AnalysisConfig,
    concurrency: usize,
    verbose: bool,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt(WELCOME_MESSAGE)?;
    if read_line(&mut lines).await?.is_none() {
        return Ok(());
    }

    loop {
        let outcomes = run_seed_batch(client, analysis, concurrency, verbose).await;
        if !looks_offline(&outcomes) {
            if !outcomes.is_empty() {
                println!(
                    "{}",
                    format!(
                        "The above are the top {} terms for {} Etsy shops.",
                        analysis.settings.top_n,
                        outcomes.len()
                    )
                    .dimmed()
                );
            }
            break;
        }
        prompt(CONNECTION_ERROR_MESSAGE)?;
        if read_line(&mut lines).await?.is_none() {
            return Ok(());
        }
    }

    loop {
        prompt(&format!("\n{USER_PROMPT}"))?;
        let Some(line) = read_line(&mut lines).await? else {
            break;
        };

        let shop = parse_shop_input(&line);
        if shop.eq_ignore_ascii_case("exit") {
            break;
        }
        if shop.is_empty() {
            println!("No user input detected. Please try again.");
            continue;
        }

        println!("{RUNNING_ANALYSIS_MESSAGE}");
        let outcomes =
            analyze_shops(client, &[shop.to_string()], &analysis.settings, 1).await;
        terminal::display_outcomes(&outcomes, verbose);
    }

    println!("Goodbye.");
    Ok(())
}

fn prompt(message: &str) -> Result<()> {
    print!("{message} ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    Ok(())
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    lines.next_line().await.context("Failed to read from stdin")
}
