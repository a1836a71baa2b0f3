use clap::Parser;

use crate::consistent_hashring::{
    HashRing,
    RingError,
};

#[derive(Debug, Parser, Clone)]
pub struct SentryConfig {
    #[arg(long, env = "SENTRY_DSN", default_value = "")]
    pub dsn: String,

    #[arg(long, env = "SENTRY_SAMPLE_RATE", default_value = "0.0")]
    pub sample_rate: f32,
}

#[derive(Debug, Parser, Clone)]
pub struct OtelConfig {
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", default_value = "")]
    pub endpoint: String,
}

#[derive(Debug, Parser, Clone)]
pub struct RingConfig {
    /// Virtual nodes per real node.
    #[arg(long, env = "HASHRING_REPLICAS", default_value_t = 50)]
    pub replicas: usize,

    /// Node identifiers, comma separated.
    #[arg(long, env = "HASHRING_NODES", value_delimiter = ',')]
    pub nodes: Vec<String>,
}

impl RingConfig {
    /// Build a ring holding the configured nodes, hashed with the default
    /// hash function.
    pub fn build(&self) -> Result<HashRing, RingError> {
        HashRing::with_nodes(self.replicas, None, self.nodes.iter().cloned())
    }
}
