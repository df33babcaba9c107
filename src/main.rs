//! Entry point for the users/quote API server.
//!
//! ```text
//! main.rs (runtime + tracing)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)   → Load environment variables
//! 2. Store Layer (src/db)           → Pool, readiness poll, users table
//! 3. API Layer (src/api)            → Router, middleware, handlers
//! ```

use coin_users_api::{cli, observability};
use tracing::error;

#[tokio::main]
async fn main() {
    // Tracing first, so config and store failures are logged.
    //   RUST_LOG: filter (e.g. "debug", "coin_users_api=trace,sqlx=warn")
    //   LOG_JSON: JSON console output ("true" or "false")
    //   LOG_FILE: daily-rotated JSON log file
    let log_settings = observability::LogSettings::from_env();

    let _log_guard = match observability::init_tracing(None, log_settings.file, log_settings.json) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
