use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

// RUST_LOG wins over the configured level. Logs go to stderr so roster output stays clean.
pub fn init(log_level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level/filter {:?}", log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {}", err))
}
