use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directive when `RUST_LOG` is unset: the service crate and the
/// HTTP trace layer at `info`, everything else at `warn`.
fn default_directive(service: &str) -> String {
    format!("warn,{service}=info,tower_http=info")
}

/// Install the JSON stdout subscriber. Later calls are no-ops.
pub fn init_tracing(service: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(service)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init();
}
