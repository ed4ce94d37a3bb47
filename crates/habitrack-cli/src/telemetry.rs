use habitrack_core::storage::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. `HABITRACK_LOG` overrides `logging.level`.
pub fn init(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_env("HABITRACK_LOG").unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
