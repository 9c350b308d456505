//! Replacement policy simulator CLI.
//!
//! This binary replays an address trace against a simulated structure. It performs:
//! 1. **Cache run:** Replay through the configured set-associative cache (default).
//! 2. **TLB run:** Replay through the configured TLB, one entry per page.
//! 3. **Reporting:** Print hit/miss/eviction counters as text or JSON.

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufReader;
use std::process;
use tracing_subscriber::EnvFilter;

use replsim_core::common::TraceError;
use replsim_core::config::{ReplacementPolicy, SimConfig};
use replsim_core::sim::trace;
use replsim_core::stats::AccessStats;
use replsim_core::{CacheSim, Tlb};

#[derive(Parser, Debug)]
#[command(
    name = "replsim",
    author,
    version,
    about = "Set-associative replacement policy simulator",
    long_about = "Replay an address trace (one address per line, hex with 0x or decimal) through a cache or TLB and report hit/miss counts.\n\nExamples:\n  replsim -t trace.txt\n  replsim -t trace.txt --policy lru --json\n  replsim -t trace.txt -c config.json --structure tlb"
)]
struct Cli {
    /// Address trace to replay.
    #[arg(short, long)]
    trace: String,

    /// JSON configuration (defaults are used when omitted).
    #[arg(short, long)]
    config: Option<String>,

    /// Override the replacement policy of the selected structure.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Override the RRIP insertion seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Structure to simulate.
    #[arg(long, value_enum, default_value_t = Structure::Cache)]
    structure: Structure,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Rrip,
    Lru,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Rrip => Self::RripDueling,
            PolicyArg::Lru => Self::LruStack,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Structure {
    Cache,
    Tlb,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok((policy, stats)) => report(&cli, policy, &stats),
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Loads configuration and trace, then replays through the selected structure.
fn run(cli: &Cli) -> Result<(&'static str, AccessStats), TraceError> {
    let mut config = match &cli.config {
        Some(path) => trace::load_config(BufReader::new(File::open(path)?))?,
        None => SimConfig::default(),
    };
    apply_overrides(cli, &mut config);

    let addrs = trace::parse_trace(BufReader::new(File::open(&cli.trace)?))?;
    tracing::info!(accesses = addrs.len(), trace = %cli.trace, "trace loaded");

    match cli.structure {
        Structure::Cache => {
            let mut cache = CacheSim::new(&config.cache)?;
            let stats = trace::replay(&mut cache, addrs);
            Ok((cache.policy_name(), stats))
        }
        Structure::Tlb => {
            let mut tlb = Tlb::new(&config.tlb)?;
            let stats = trace::replay_tlb(&mut tlb, addrs);
            Ok((tlb.policy_name(), stats))
        }
    }
}

fn apply_overrides(cli: &Cli, config: &mut SimConfig) {
    if let Some(policy) = cli.policy {
        config.cache.policy = policy.into();
        config.tlb.policy = policy.into();
    }
    if let Some(seed) = cli.seed {
        config.cache.rrip.seed = seed;
        config.tlb.rrip.seed = seed;
    }
}

fn report(cli: &Cli, policy: &str, stats: &AccessStats) {
    if cli.json {
        match serde_json::to_string_pretty(stats) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("\n[!] FATAL: cannot encode statistics: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{:?} ({policy})", cli.structure);
        println!("{stats}");
    }
}
