//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "GRADEBOOK_LOG";

/// Initialize the gradebook tracing/logging system.
///
/// Reads `GRADEBOOK_LOG` for per-crate log levels, e.g.
/// `GRADEBOOK_LOG=gradebook_analysis=debug,gradebook_storage=info`.
///
/// Falls back to `gradebook=info` if `GRADEBOOK_LOG` is not set or is invalid.
/// Calling it more than once is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("gradebook=info"));

        // try_init: a host process may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
