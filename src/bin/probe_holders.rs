//! Fetch the top holders of a mint without running the HTTP service.
//!
//! Usage: probe-holders --mint <MINT> [--limit 10] [--rpc <URL>] [--lazy-program] [--table]

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use reqwest::Client;
use serde_json::json;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use topholders::config::Config;
use topholders::services::amount::{format_ui_amount_fixed, shorten};
use topholders::services::rpc::{RpcClient, RPC_TIMEOUT};
use topholders::services::token::{parse_limit, HolderAggregator};
use topholders::types::models::HoldersResult;

#[derive(Parser, Debug)]
#[command(name = "probe-holders", version, about = "Top holders of a token mint, aggregated per owner")]
struct Args {
    /// Token mint address
    #[arg(long)]
    mint: Option<String>,
    /// Number of holders to return, clamped to 2..=10
    #[arg(long)]
    limit: Option<String>,
    /// RPC endpoint, defaults to SOLANA_RPC_URL
    #[arg(long)]
    rpc: Option<String>,
    /// Only look up the mint's token program after a mint-not-found error
    #[arg(long = "lazy-program")]
    lazy_program: bool,
    /// Print a ranked table instead of JSON
    #[arg(long)]
    table: bool,
}

fn render_table(result: &HoldersResult) -> String {
    let mut out = format!("Top {} holders of {}\n", result.holders.len(), result.mint);
    for (rank, holder) in result.holders.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<15} {:>24}\n",
            rank + 1,
            shorten(&holder.owner, 4),
            format_ui_amount_fixed(&holder.amount_raw, holder.decimals, 2)
        ));
    }
    out
}

async fn run(args: &Args, mint: &str, config: &Config) -> Result<String> {
    let limit = parse_limit(args.limit.as_deref());
    let rpc_url = args
        .rpc
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(config.rpc_url.as_str());
    let eager = config.eager_program_lookup && !args.lazy_program;

    let http = Client::builder().timeout(RPC_TIMEOUT).build()?;
    let aggregator =
        HolderAggregator::new(RpcClient::new(http, rpc_url)).eager_program_lookup(eager);
    let result = aggregator.top_holders(mint, limit).await?;

    if args.table {
        return Ok(render_table(&result));
    }
    let output = json!({
        "mint": result.mint,
        "limit": result.limit,
        "holders": result.holders,
        "rpcUrl": result.rpc_url,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let Some(mint) = args.mint.as_deref().map(str::trim).filter(|m| !m.is_empty()) else {
        eprintln!("Missing --mint");
        return ExitCode::from(1);
    };

    let config = Config::from_env();
    match run(&args, mint, &config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Probe error: {}", e);
            ExitCode::from(2)
        }
    }
}
