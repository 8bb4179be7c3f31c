//! Tracing subscriber setup for embedding applications.

use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Install a global tracing subscriber.
///
/// Filtering follows `RUST_LOG` when set, otherwise defaults to `info` for
/// this crate and `warn` elsewhere. Safe to call more than once; only the
/// first call installs anything.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,lookforge=info"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .compact();

        // An embedder may already hold the global subscriber slot.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
