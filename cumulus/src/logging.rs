use std::ffi::OsStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log file path.
pub const LOG_ENV: &str = "CUMULUS_LOG";

/// Initialize tracing with file output.
///
/// The terminal belongs to the UI, so logging is off unless `CUMULUS_LOG`
/// names a file. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    init_tracing_to(std::env::var_os(LOG_ENV).as_deref());
}

/// Install a file subscriber writing to `log_path`.
///
/// Returns whether a subscriber was installed.
fn init_tracing_to(log_path: Option<&OsStr>) -> bool {
    let Some(log_path) = log_path else {
        return false;
    };

    let file = match std::fs::File::create(log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file {}: {}", log_path.to_string_lossy(), e);
            return false;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // A second call (tests, embedding) keeps the first subscriber.
    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .try_init()
        .is_ok()
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
