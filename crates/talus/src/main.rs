//! Talus - minimal stub-to-recursive DNS resolver.
//!
//! Thin driver over the resolution engine: take a domain (argument or
//! prompt), optionally consult the blocklist policy store, resolve, print
//! an address.

use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use std::io::Write;
use std::path::PathBuf;
use talus_policy::PolicyStore;
use talus_proto::{RecordClass, RecordType};
use talus_resolver::{IterativeResolver, ResolverConfig};
use tracing_subscriber::EnvFilter;

/// Talus - resolve a domain name iteratively from the root servers
#[derive(Parser, Debug)]
#[command(name = "talus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Domain name to resolve; prompted for when omitted
    domain: Option<String>,

    /// Query type (A, AAAA, NS, CNAME)
    #[arg(short = 't', long, default_value = "A", value_name = "TYPE")]
    qtype: String,

    /// Print every answer record as JSON instead of one address
    #[arg(long)]
    json: bool,

    /// Policy file with blocklists and user assignments
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// User key checked against the policy file before resolving
    #[arg(long, value_name = "KEY", requires = "policy")]
    user_key: Option<String>,

    /// Log filter (e.g. "talus_resolver=debug")
    #[arg(short, long, default_value = "warn", value_name = "FILTER")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let qtype = RecordType::from_name(&cli.qtype)
        .with_context(|| format!("unsupported query type '{}'", cli.qtype))?;

    let domain = match cli.domain {
        Some(domain) => domain,
        None => prompt("domain: ")?,
    };

    if let (Some(path), Some(key)) = (&cli.policy, &cli.user_key) {
        let store = PolicyStore::from_file(path)
            .with_context(|| format!("failed to load policy from {}", path.display()))?;
        if store.is_blocked(key, &domain) {
            println!("{domain} is blocked");
            return Ok(());
        }
    }

    let resolver = IterativeResolver::new(ResolverConfig::default());
    let response = resolver.lookup(&domain, qtype, RecordClass::IN).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(response.answers())?);
        return Ok(());
    }

    // One address chosen at random among the answers
    match response.answers().choose(&mut rand::thread_rng()) {
        Some(answer) => println!("{}", answer.rdata()),
        None => println!("no answer for {domain}"),
    }

    Ok(())
}

/// Reads a domain name from stdin.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let domain = line.trim().to_string();
    anyhow::ensure!(!domain.is_empty(), "no domain given");
    Ok(domain)
}
