// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranslationMode};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod audio_processor;
mod document_processor;
mod errors;
mod file_utils;
mod language_utils;
mod page_store;
mod providers;

/// CLI Wrapper for TranslationMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationMode {
    Ask,
    Always,
    Never,
}

impl From<CliTranslationMode> for TranslationMode {
    fn from(cli_mode: CliTranslationMode) -> Self {
        match cli_mode {
            CliTranslationMode::Ask => TranslationMode::Ask,
            CliTranslationMode::Always => TranslationMode::Always,
            CliTranslationMode::Never => TranslationMode::Never,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a PDF document into an audiobook (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for librovoz
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input PDF document to convert
    #[arg(value_name = "SOURCE_PDF")]
    source: PathBuf,

    /// Base name for every generated artifact (defaults to the file stem)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Translation decision mode
    #[arg(short, long, value_enum)]
    mode: Option<CliTranslationMode>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Librovoz - PDF to audiobook converter
///
/// Splits a PDF into pages, optionally translates each page between Spanish
/// and English, synthesizes speech per page and joins the result into a
/// single audiobook WAV.
#[derive(Parser, Debug)]
#[command(name = "librovoz")]
#[command(author = "Librovoz Team")]
#[command(version = "0.1.0")]
#[command(about = "PDF to audiobook converter with AI translation")]
#[command(long_about = "Librovoz splits a PDF into per-page documents, extracts the text of every
page, decides once per run whether to translate between Spanish and English,
synthesizes speech for each page and joins everything into one WAV audiobook.

EXAMPLES:
    librovoz book.pdf                           # Convert using default config
    librovoz -m always book.pdf                 # Translate without prompting
    librovoz -m never -b libro book.pdf         # Keep source text, custom base name
    librovoz --log-level debug book.pdf         # Convert with debug logging
    librovoz completions bash > librovoz.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SERVICES:
    translation - NLLB sidecar service (default: http://localhost:5000)
    tts         - MMS sidecar service (default: http://localhost:5001)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PDF document to convert
    #[arg(value_name = "SOURCE_PDF")]
    source: Option<PathBuf>,

    /// Base name for every generated artifact (defaults to the file stem)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Translation decision mode
    #[arg(short, long, value_enum)]
    mode: Option<CliTranslationMode>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => writeln!(stderr, "\x1B[1;31m{} {} {}\x1B[0m", now, emoji, record.args()),
                Level::Warn => writeln!(stderr, "\x1B[1;33m{} {} {}\x1B[0m", now, emoji, record.args()),
                Level::Info => writeln!(stderr, "\x1B[1;32m{} {} {}\x1B[0m", now, emoji, record.args()),
                Level::Debug => writeln!(stderr, "\x1B[1;36m{} {} {}\x1B[0m", now, emoji, record.args()),
                Level::Trace => writeln!(stderr, "\x1B[1;35m{} {} {}\x1B[0m", now, emoji, record.args()),
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "librovoz", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let source = cli.source.ok_or_else(|| {
                anyhow!("SOURCE_PDF is required when no subcommand is specified")
            })?;

            let convert_args = ConvertArgs {
                source,
                base_name: cli.base_name,
                mode: cli.mode,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_convert(convert_args).await
        }
    }
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        let log_level = match config_log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };
        log::set_max_level(log_level);
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config: Config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(mode) = &options.mode {
        config.translation.mode = mode.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    // Create controller and run the pipeline
    let controller = Controller::with_config(config)?;
    controller.run(options.source, options.base_name).await?;

    Ok(())
}
