use tracing_subscriber::EnvFilter;

/// Install a JSON logger and bridge `log` macro output into `tracing`.
///
/// Opt-in: callers that already installed a global subscriber keep it, the
/// failure is reported on stderr and the engine keeps logging through
/// whatever is in place.
pub fn init_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}
