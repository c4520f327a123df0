// restoration-server/src/telemetry.rs

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. `RUST_LOG` selects levels, `LOG_FORMAT=json`
/// switches to JSON lines.
pub fn init_tracing() -> anyhow::Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
  let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);

  let installed = if json {
    builder.json().try_init()
  } else {
    builder.try_init()
  };
  installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
