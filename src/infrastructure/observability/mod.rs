use tracing::Level;
use tracing_subscriber::prelude::*;

/// Bootstraps structured logging: pretty stdout output, `RUST_LOG`-driven
/// filtering with an `INFO` floor.
pub fn init_tracing() {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();
}
