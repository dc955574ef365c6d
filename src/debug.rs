//! Log bridge for par-text.
//!
//! Routes every `log::info!()` etc. from all workspace crates to
//! /tmp/par_text_debug.log on Unix/macOS, or %TEMP%\par_text_debug.log on
//! Windows. When `RUST_LOG` is set, records are mirrored to stderr.
//!
//! Level precedence: the `--log-level` CLI flag, then `RUST_LOG`, then the
//! config file's `log_level`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_to_stderr: bool,
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the CLI or `RUST_LOG` chose the level; the config may not
/// override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/par_text_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("par_text_debug.log")
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Level named by a `RUST_LOG` value. Only a bare level name is
/// understood; per-module directives fall back to `Info`.
pub fn level_from_env(value: Option<&str>) -> Option<LevelFilter> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.parse().unwrap_or(LevelFilter::Info))
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_to_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Install the bridge as the global logger. Later calls do nothing.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_level = level_from_env(std::env::var("RUST_LOG").ok().as_deref());
    let level = cli_level.or(env_level);
    LEVEL_PINNED.store(level.is_some(), Ordering::Relaxed);

    let path = log_path();
    // silently run without a file if it cannot be opened
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .ok();

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        file: Mutex::new(file),
        mirror_to_stderr: env_level.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        return;
    }
    log::set_max_level(level.unwrap_or(LevelFilter::Warn));

    log::info!(
        "par-text debug session started (level={}, log={:?})",
        log::max_level(),
        path
    );
}

/// Apply the config file's level unless the CLI or `RUST_LOG` set one.
pub fn apply_config_level(level: LevelFilter) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level);
    log::debug!("Log level set from config: {}", level);
}
