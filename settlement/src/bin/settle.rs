//! Settlement command line
//!
//! Reads a JSON array of `{"id": "...", "balance": "12.34"}` and prints the
//! moves that settle it.
//!
//! Usage: `settle [--greedy] [--json] <balances.json>`

use anyhow::{bail, Context};
use settlement::{Config, SettleEntry, SettlementEngine};

struct Args {
    greedy: bool,
    json: bool,
    path: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut greedy = false;
    let mut json = false;
    let mut path = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--greedy" => greedy = true,
            "--json" => json = true,
            flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
            _ if path.is_some() => bail!("only one balances file may be given"),
            _ => path = Some(arg),
        }
    }

    let path = path.context("usage: settle [--greedy] [--json] <balances.json>")?;
    Ok(Args { greedy, json, path })
}

fn load_config() -> anyhow::Result<Config> {
    let config = match std::env::var("SETTLEMENT_CONFIG") {
        Ok(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        Err(_) => Config::from_env()?,
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let mut config = load_config()?;

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path))?;
    let entries: Vec<SettleEntry<String>> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", args.path))?;

    tracing::info!(participants = entries.len(), file = %args.path, "Loaded balances");

    if args.greedy {
        // Everything exceeds a zero limit, so the search never runs
        config.search.limit = 0;
    }

    let settlement = SettlementEngine::new(config)?.settle(entries)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&settlement)?);
        return Ok(());
    }

    for mv in &settlement.moves {
        println!("{}", mv);
    }
    println!(
        "{} move(s), {} transferred ({})",
        settlement.stats.move_count, settlement.stats.total_transferred, settlement.strategy
    );
    if !settlement.strategy.is_minimal() {
        println!("note: greedy settlement, move count may not be minimal");
    }

    Ok(())
}
