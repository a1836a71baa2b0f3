use anyhow::{
    Context,
    Result,
    bail,
};
use clap::{
    Parser,
    ValueEnum,
};
use hashring::{
    analysis,
    config::{
        OtelConfig,
        RingConfig,
        SentryConfig,
    },
    observability,
};
use tracing::{
    error,
    info,
};

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Mode {
    /// Print the node owning each key.
    Route,
    /// Print each node's share of a synthetic key sample.
    Distribution,
    /// Print the fraction of a synthetic key sample remapped by adding a node.
    Churn,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "hashring", about = "Route keys to nodes on a consistent hash ring.")]
struct Config {
    #[clap(flatten)]
    ring: RingConfig,

    #[clap(flatten)]
    sentry: SentryConfig,

    #[clap(flatten)]
    otel: OtelConfig,

    #[arg(long, env = "HASHRING_MODE", default_value = "route")]
    mode: Mode,

    /// Number of synthetic keys for distribution and churn.
    #[arg(long, env = "HASHRING_SAMPLE", default_value_t = 100_000)]
    sample: usize,

    /// Node added to the ring in churn mode.
    #[arg(long)]
    add_node: Option<String>,

    /// Keys to route.
    keys: Vec<String>,
}

fn main() -> Result<()> {
    let config = Config::parse();
    let _sentry = observability::init_tracing_and_sentry(config.sentry.clone());

    let meter_provider = observability::init_otel_metrics(config.otel.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize OpenTelemetry metrics: {e}"))?;

    info!(config = ?config, version = env!("CARGO_PKG_VERSION"), "Starting hashring");

    let result = run(&config);
    if let Err(e) = &result {
        error!("hashring failed: {e:#}");
    }

    if let Some(provider) = meter_provider {
        if let Err(e) = provider.shutdown() {
            error!("Failed to flush metrics: {e}");
        }
    }

    result
}

fn run(config: &Config) -> Result<()> {
    let ring = config.ring.build().context("Failed to build hash ring")?;
    info!(positions = ring.len(), nodes = ?ring.nodes(), "Hash ring ready");

    match config.mode {
        Mode::Route => {
            for key in &config.keys {
                match ring.get_node(key) {
                    Some(node) => println!("{key} -> {node}"),
                    None => println!("{key} -> <empty>"),
                }
            }
        },
        Mode::Distribution => {
            let keys = analysis::sample_keys(config.sample);
            for (node, count) in analysis::distribution(&ring, &keys) {
                println!("{node}: {count} ({:.2}%)", percent(count, keys.len()));
            }
        },
        Mode::Churn => {
            let Some(new_node) = &config.add_node else {
                bail!("--add-node is required in churn mode");
            };

            let mut grown = ring.clone();
            grown.add_node(new_node.clone());

            let keys = analysis::sample_keys(config.sample);
            let fraction = analysis::remapped_fraction(&ring, &grown, &keys);
            println!(
                "adding {new_node} to {} node(s) remapped {:.2}% of {} keys",
                ring.nodes().len(),
                fraction * 100.0,
                keys.len()
            );
        },
    }

    Ok(())
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
