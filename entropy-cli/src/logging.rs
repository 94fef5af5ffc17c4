use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_DIRECTIVES: &str = "warn";
const VERBOSE_LOG_DIRECTIVES: &str = "warn,entropy_core=debug,entropy_ingest=debug,entropy=debug";

/// Log to stderr so stdout stays pipeable. `ENTROPY_LOG` wins over `RUST_LOG`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let fallback = if verbose {
        VERBOSE_LOG_DIRECTIVES
    } else {
        DEFAULT_LOG_DIRECTIVES
    };

    let env_filter = EnvFilter::try_from_env("ENTROPY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|err| anyhow!("invalid log filter: {err}"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .map_err(|err| anyhow!("logger already initialized: {err}"))?;

    Ok(())
}
