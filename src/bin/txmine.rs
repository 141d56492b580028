use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use txmine::{rank_patterns, types::ItemName, MinSupport, TransactionalDatabase};

/// Frequent itemset mining over whitespace-separated transactions.
#[derive(Parser, Debug)]
#[command(name = "txmine", version, about)]
struct Cli {
    /// Transaction file: one transaction per line, items separated by whitespace
    file: PathBuf,

    /// Minimum support: a transaction count (3) or a fraction of them (0.05)
    #[arg(short = 's', long, env = "TXMINE_MIN_SUPPORT")]
    min_support: MinSupport,

    /// How many of the most frequent items to list in the summary
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Drop transactions with fewer items before mining
    #[arg(long, default_value_t = 1)]
    min_length: usize,

    /// Drop transactions with more items before mining
    #[arg(long)]
    max_length: Option<usize>,

    /// Print at most this many patterns
    #[arg(long)]
    max_patterns: Option<usize>,

    /// Only print the summary, do not mine
    #[arg(long)]
    stats_only: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut database = TransactionalDatabase::from_path(&cli.file)?;
    if cli.min_length > 1 || cli.max_length.is_some() {
        database
            .filter_transactions(cli.min_length, cli.max_length)
            .context("filtering transactions by length")?;
    }

    println!("{}", database.stats(cli.top));
    if cli.stats_only {
        return Ok(());
    }

    let patterns = database
        .find_frequent_patterns(cli.min_support)
        .with_context(|| format!("mining {}", cli.file.display()))?;

    let mut ranked = rank_patterns(patterns);
    ranked.truncate(cli.max_patterns.unwrap_or(usize::MAX));
    let patterns: Vec<Vec<ItemName>> = ranked.iter().map(|(pattern, _)| pattern.clone()).collect();
    let supports = database.supports(&patterns);

    println!("Frequent patterns (min support {}):", cli.min_support);
    for ((pattern, count), support) in ranked.iter().zip(supports) {
        println!("  ({}): {} [database support {}]", pattern.join(", "), count, support);
    }
    Ok(())
}
