use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,reqwest=warn";

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `CHESSBOT_LOG_FORMAT=text` switches from JSON lines to plain text for
/// local runs.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let plain = std::env::var("CHESSBOT_LOG_FORMAT").is_ok_and(|format| format == "text");

    let base = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if plain {
        registry.with(base).init();
    } else {
        registry.with(base.json()).init();
    }
}
