//! Command-line interface for the par-text demo.

use std::path::PathBuf;

use clap::Parser;

/// par-text - GPU text rendering from glyph page atlases
#[derive(Parser, Debug)]
#[command(name = "par-text")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Font file to render with (overrides config)
    #[arg(long, value_name = "PATH", conflicts_with = "family")]
    pub font: Option<PathBuf>,

    /// Installed font family to render with (overrides config)
    #[arg(long, value_name = "NAME")]
    pub family: Option<String>,

    /// Main font pixel size (overrides config)
    #[arg(long, value_name = "PIXELS")]
    pub size: Option<u32>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Exit after the specified number of seconds
    #[arg(long, value_name = "SECONDS")]
    pub exit_after: Option<f64>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeOptions {
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Font file override
    pub font_path: Option<PathBuf>,
    /// Font family override
    pub font_family: Option<String>,
    /// Pixel size override
    pub pixel_size: Option<u32>,
    /// Exit after this many seconds
    pub exit_after: Option<f64>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            font_path: cli.font,
            font_family: cli.family,
            pixel_size: cli.size,
            exit_after: cli.exit_after,
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
        }
    }
}

/// Parse the process arguments.
///
/// Exits the process on `--help`, `--version` or a usage error.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
