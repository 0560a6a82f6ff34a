// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use exhibit_linker::app_config::{self, Config};
use exhibit_linker::app_controller::{Controller, RunOptions};
use exhibit_linker::document::RunReport;

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
    /// Relabel exhibit citations in documents (default command)
    Relabel(RelabelArgs),

    /// Generate shell completions for exhibit-linker
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RelabelArgs {
    /// Input document file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: RelabelOptions,
}

#[derive(Args, Debug, Clone)]
struct RelabelOptions {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Exhibit map file, used instead of the configured exhibits_file and
    /// merged with the inline exhibits (a key defined in both is an error)
    #[arg(short, long)]
    exhibits: Option<PathBuf>,

    /// Rewrite input documents instead of writing <name>.relabeled.json
    #[arg(short, long)]
    in_place: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not attach exhibit URLs to rewritten labels
    #[arg(long)]
    no_links: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// exhibit-linker - Exhibit citation relabeling
///
/// Rewrites quoted exhibit citations in documents with their canonical
/// exhibit labels and links them to the exhibit files.
#[derive(Parser, Debug)]
#[command(name = "exhibit-linker")]
#[command(version)]
#[command(about = "Relabel and link exhibit citations in documents")]
#[command(long_about = "exhibit-linker finds citations such as \"EXHIBIT - 20160217 exhibit desc\" in
JSON documents, replaces them with the canonical exhibit label and links the
label to the exhibit file.

EXAMPLES:
    exhibit-linker brief.json                      # Write brief.relabeled.json
    exhibit-linker -i brief.json                   # Rewrite brief.json in place
    exhibit-linker -e exhibits.json brief.json     # Use an exhibit map file
    exhibit-linker -n --log-level debug briefs/    # Dry run over a directory
    exhibit-linker completions bash > el.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: RelabelOptions,
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

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
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
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "exhibit-linker", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Relabel(args)) => run_relabel(&args.input_path, args.options),
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_relabel(&input_path, cli.options)
        }
    }
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::load(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

fn run_relabel(input_path: &Path, options: RelabelOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(exhibits) = &options.exhibits {
        let absolute = std::path::absolute(exhibits)
            .with_context(|| format!("Invalid exhibits path: {:?}", exhibits))?;
        config.exhibits_file = Some(absolute.to_string_lossy().to_string());
    }
    if options.no_links {
        config.relabel.attach_links = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let config_dir = match Path::new(&options.config_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let controller = Controller::with_config(config, &config_dir)?.exclude(&options.config_path);

    let run_options = RunOptions {
        in_place: options.in_place,
        force_overwrite: options.force_overwrite,
        dry_run: options.dry_run,
    };

    if input_path.is_file() {
        let report = controller.run(input_path, &run_options)?;
        log_summary(&report);
    } else if input_path.is_dir() {
        let folder = controller.run_folder(input_path, &run_options)?;
        if folder.failed > 0 {
            return Err(anyhow!("{} document(s) failed to process", folder.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

fn log_summary(report: &RunReport) {
    info!(
        "Replaced {} citation(s), {} link(s), {} not found, {} unused exhibit(s)",
        report.stats.replacements,
        report.stats.links,
        report.misses.len(),
        report.unused.len()
    );
}
