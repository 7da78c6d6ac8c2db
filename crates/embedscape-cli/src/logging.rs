use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Command;

/// Installs the stderr subscriber. `RUST_LOG` wins over the per-command default.
pub(crate) fn init(cmd: &Command) {
    let default_level = match cmd {
        Command::Serve { .. } => "info",
        Command::Embed { .. } | Command::Layout { .. } | Command::Criteria => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
