use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the JSON log subscriber. `RUST_LOG` overrides `default_filter`.
pub fn get_subscriber(default_filter: &str) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
}

/// Install the JSON subscriber globally. Also routes `log` records (actix's
/// access logger) into tracing. Call once at startup.
pub fn init_telemetry() {
    get_subscriber("info").init();
}
