use anyhow::{Context, Result, anyhow};
use tracing_subscriber::filter::{Directive, EnvFilter};

/// Install the stderr logger.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) -> Result<()> {
    let directive: Directive = default_level
        .parse()
        .with_context(|| format!("invalid log level: {default_level}"))?;
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))
}
