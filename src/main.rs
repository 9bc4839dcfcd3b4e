//! Sitemapper main entry point
//!
//! Command-line interface for the sitemapper crawler. Validates the seed
//! URL and worker count, runs the crawl, and writes the rendered tree to
//! `sitemap.txt` in the working directory.

use clap::Parser;
use sitemapper::{canonicalize_seed, crawl, prettify_sitemap};
use tracing_subscriber::EnvFilter;

const SITEMAP_PATH: &str = "sitemap.txt";

/// Crawl a single domain and write a tree-shaped sitemap
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "Crawls a single domain and writes a tree-shaped sitemap", long_about = None)]
struct Cli {
    /// The URL to crawl
    #[arg(long)]
    url: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=10))]
    workers: u8,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let seed = match canonicalize_seed(&cli.url) {
        Ok(seed) => seed,
        Err(err) => {
            tracing::error!("Invalid --url value: {}", err);
            return Err(err.into());
        }
    };

    tracing::info!("Crawling {} with {} workers", seed, cli.workers);
    let root = crawl(&seed, cli.workers as usize).await?;

    std::fs::write(SITEMAP_PATH, prettify_sitemap(&root, 0))?;
    tracing::info!("Sitemap written to {}", SITEMAP_PATH);

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["sitemapper", "--url", "https://example.com"]).unwrap();
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.workers, 4);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_rejects_missing_url() {
        assert!(Cli::try_parse_from(["sitemapper"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_workers() {
        let result = Cli::try_parse_from([
            "sitemapper",
            "--url",
            "https://example.com",
            "--workers",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_too_many_workers() {
        let result = Cli::try_parse_from([
            "sitemapper",
            "--url",
            "https://example.com",
            "--workers",
            "11",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_accepts_worker_range_bounds() {
        for workers in ["1", "10"] {
            let cli = Cli::try_parse_from([
                "sitemapper",
                "--url",
                "https://example.com",
                "--workers",
                workers,
            ])
            .unwrap();
            assert_eq!(cli.workers.to_string(), workers);
        }
    }

    #[test]
    fn test_seed_without_scheme_fails_validation() {
        // clap accepts the flag; canonicalization is what rejects it
        let cli = Cli::try_parse_from(["sitemapper", "--url", "noscheme.com"]).unwrap();
        assert!(canonicalize_seed(&cli.url).is_err());
    }
}
