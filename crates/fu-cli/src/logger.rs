use anyhow::{Result, anyhow};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber on stderr, keeping stdout free for
/// command output. The filter comes from `RUST_LOG` and defaults to `info`;
/// at debug or trace level span close events carry their timings.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let directives = filter.to_string();
    let spans = if directives.contains("debug") || directives.contains("trace") {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(spans)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}
