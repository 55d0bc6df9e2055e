use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_METRICS_PREFIX: &str = "http_server";

// ─── Observer configuration ──────────────────────────────────────

/// Fixed at construction; the observer never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Metric group, the histogram is named `<metrics_prefix>.request_latency`
    #[serde(default = "default_metrics_prefix")]
    pub metrics_prefix: String,

    /// Log header diagnostics and swallowed failures
    #[serde(default)]
    pub debug: bool,
}

fn default_metrics_prefix() -> String {
    DEFAULT_METRICS_PREFIX.into()
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            metrics_prefix: default_metrics_prefix(),
            debug: false,
        }
    }
}

// ─── Demo server CLI ─────────────────────────────────────────────

#[derive(Debug, Clone, Parser)]
#[command(
    name = "request-latency",
    about = "Serve a demo app that records X-Request-Start latency"
)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "REQUEST_LATENCY_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Metric group for the latency histogram
    #[arg(
        long,
        env = "REQUEST_LATENCY_METRICS_PREFIX",
        default_value = DEFAULT_METRICS_PREFIX
    )]
    pub metrics_prefix: String,

    /// Log every X-Request-Start value and any recording failure
    #[arg(long, env = "REQUEST_LATENCY_DEBUG")]
    pub debug: bool,

    /// Debug-level logging for the whole process
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<&ServerArgs> for ObserverConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            metrics_prefix: args.metrics_prefix.clone(),
            debug: args.debug,
        }
    }
}
