// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::sync::Arc;

use anyhow::Result;
use par_text::app::App;
use par_text::cli;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = cli::process_cli();

    // CLI --log-level takes precedence, then RUST_LOG, then config (applied later)
    par_text::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting par-text demo");

    // Adapter and device requests are async; nothing else needs worker threads
    let runtime = Arc::new(
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?,
    );

    let app = App::new(Arc::clone(&runtime), runtime_options)?;
    let result = app.run();

    log::info!("Event loop exited, shutting down");
    if let Err(ref e) = result {
        eprintln!("par-text: error: {e:#}");
        // On Linux, provide a hint when the error looks like a missing display server
        #[cfg(target_os = "linux")]
        {
            let msg = format!("{e:?}").to_lowercase();
            if msg.contains("display") || msg.contains("wayland") || msg.contains("x server") {
                eprintln!(
                    "par-text: hint: no display server found; ensure DISPLAY (X11) or \
                     WAYLAND_DISPLAY (Wayland) is set"
                );
            }
        }
    }
    log::logger().flush();
    result
}
