use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global fmt subscriber.
///
/// `REQUEST_LATENCY_LOG` wins over `RUST_LOG`; without either the level is
/// `debug` when `verbose` is set and `info` otherwise.
pub fn init_logging(verbose: bool) {
    let filter = std::env::var("REQUEST_LATENCY_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(if verbose { "debug" } else { "info" }),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(true);
        init_logging(false);
    }
}
