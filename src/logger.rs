use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "cliptrans.log";

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the global subscriber: stderr plus `cliptrans.log` next to the
/// executable. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let path = exe_dir().join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| {
            writeln!(f, "===== cliptrans start =====")?;
            Ok(f)
        });
    let (file_layer, file_error) = match file {
        Ok(f) => {
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(f));
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!(path = %path.display(), error = %e, "log file unavailable, logging to stderr only");
    }
}
