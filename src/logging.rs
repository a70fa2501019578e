use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "outfitpilot_backend=debug,tower_http=debug,info",
        Environment::Staging => "outfitpilot_backend=debug,tower_http=info,info",
        Environment::Prod => "outfitpilot_backend=info,tower_http=info,warn",
    }
}

/// Install the global subscriber: pretty output with source locations
/// in dev, JSON lines in prod. `RUST_LOG` overrides the defaults.
pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    match env {
        Environment::Prod => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json().flatten_event(true))
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.pretty())
            .init(),
    }

    tracing::info!(environment = ?env, "Logging initialized");
}
