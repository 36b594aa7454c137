use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doccov::cli::commands::{analyze, config, coverage, improve};
use doccov::{Language, OutputFormat};

#[derive(Parser)]
#[command(name = "doccov")]
#[command(
    version,
    about = "Documentation coverage analyzer and doc-stub generator for source files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Show debug logs")]
    verbose: bool,

    #[arg(long, short, global = true, help = "Only show errors")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report documentation coverage for one file
    Analyze {
        #[arg(help = "Source file to analyze")]
        file: PathBuf,
        #[arg(short = 'f', long, help = "Output format: text, json, yaml")]
        format: Option<OutputFormat>,
        #[arg(short = 'l', long, help = "Language override (python, js, ts, rust, html, css)")]
        language: Option<Language>,
        #[arg(long, help = "Count the module header as a construct")]
        module_header: bool,
    },

    /// Insert doc blocks for undocumented constructs
    Improve {
        #[arg(help = "Source file to improve")]
        file: PathBuf,
        #[arg(help = "Write here instead of overwriting FILE")]
        output: Option<PathBuf>,
        #[arg(long = "dry-run", help = "Print the result instead of writing it")]
        dry_run: bool,
        #[arg(short = 'l', long, help = "Language override (python, js, ts, rust, html, css)")]
        language: Option<Language>,
        #[arg(long, help = "LLM provider: none, openai, ollama")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
        #[arg(long, help = "Per-request generation timeout in seconds")]
        timeout: Option<u64>,
        #[arg(long, help = "Document the module header too")]
        module_header: bool,
    },

    /// Aggregate coverage over a directory
    Coverage {
        #[arg(default_value = ".", help = "Directory to walk")]
        dir: PathBuf,
        #[arg(short = 'f', long, help = "Output format: text, json, yaml")]
        format: Option<OutputFormat>,
        #[arg(long, help = "Fail when coverage (percent) is below this")]
        min: Option<f64>,
        #[arg(long, help = "Count module headers as constructs")]
        module_header: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdoccov encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            format,
            language,
            module_header,
        } => {
            analyze::run(analyze::AnalyzeOptions {
                file,
                language,
                format,
                module_header,
            })?;
        }
        Commands::Improve {
            file,
            output,
            dry_run,
            language,
            provider,
            model,
            timeout,
            module_header,
        } => {
            improve::run(improve::ImproveOptions {
                file,
                output,
                dry_run,
                language,
                provider,
                model,
                timeout_secs: timeout,
                module_header,
                quiet: cli.quiet,
            })?;
        }
        Commands::Coverage {
            dir,
            format,
            min,
            module_header,
        } => {
            coverage::run(coverage::CoverageOptions {
                dir,
                format,
                min,
                module_header,
            })?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => config::show(&format)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { global, force } => config::init(global, force)?,
        },
    }

    Ok(())
}
