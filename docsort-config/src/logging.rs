use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset. Pipeline traces are emitted at
/// `info` on `docsort::pipeline`.
pub const DEFAULT_LOG_FILTER: &str = "info,docsort::pipeline=info";

/// Install the global subscriber: `RUST_LOG` (or `default_filter`) plus the
/// fmt layer. Returns an error if a subscriber is already installed.
pub fn init_tracing(default_filter: Option<&str>) -> anyhow::Result<()> {
    let fallback = default_filter.unwrap_or(DEFAULT_LOG_FILTER).to_string();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
