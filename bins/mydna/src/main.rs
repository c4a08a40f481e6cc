//! MyDNA CLI - check ingredient lists against intolerance profiles
//!
//! Cleans OCR or typed text, matches it against the profiles in a profile
//! book, and manages that book.

use clap::{Args, Parser, Subcommand, ValueEnum};
use mydna_cli::output::{format_duration, Status};
use mydna_core::error::exit_codes;
use mydna_core::Config;
use mydna_matching::MatchError;
use mydna_telemetry::{TelemetryConfig, Timer};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod input;

use commands::Context;
use input::InputArgs;

/// Check ingredient lists against intolerance profiles
#[derive(Parser)]
#[command(name = "mydna")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .mydna.toml, then the user config dir)
    #[arg(short, long, global = true, env = "MYDNA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Which profile book and profile a command works on
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Profile book (defaults to general.profiles_path)
    #[arg(long, env = "MYDNA_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Profile name (defaults to general.default_profile)
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean raw OCR text
    Clean {
        #[command(flatten)]
        input: InputArgs,

        /// Print the text after every cleaning step
        #[arg(long)]
        steps: bool,
    },

    /// Clean and split text into candidate tokens
    Tokenize {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Split a typed ingredient list, dropping stop words
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Extract candidate ingredient names from document text
    Extract {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Exact scan of label text against a profile (or every profile)
    Scan {
        #[command(flatten)]
        target: ProfileArgs,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Containment test of an ingredient list against a profile
    Test {
        #[command(flatten)]
        target: ProfileArgs,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Analyze a diet plan (JSON or text) against a profile
    Diet {
        #[command(flatten)]
        target: ProfileArgs,

        /// Diet plan file
        #[arg(long)]
        file: PathBuf,
    },

    /// Items shared by all profiles and unique to each
    Compare {
        #[command(flatten)]
        target: ProfileArgs,
    },

    /// Manage the profile book
    Profile {
        /// Profile book (defaults to general.profiles_path)
        #[arg(long, env = "MYDNA_PROFILES", global = true)]
        profiles: Option<PathBuf>,

        #[command(subcommand)]
        action: commands::profile::ProfileCommand,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(code) => exit(code),
        Err(err) => {
            report_error(&err, format);
            exit(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose, cli.format);

    let ctx = Context::new(config, cli.format);
    let timer = Timer::start("command");

    let code = match cli.command {
        Commands::Clean { input, steps } => commands::text::clean(&ctx, &input.read()?, steps)?,
        Commands::Tokenize { input } => commands::text::tokenize(&ctx, &input.read()?)?,
        Commands::Parse { input } => commands::text::parse(&ctx, &input.read()?)?,
        Commands::Extract { input } => commands::text::extract(&ctx, &input.read()?)?,
        Commands::Scan { target, input } => commands::check::scan(&ctx, &target, &input.read()?)?,
        Commands::Test { target, input } => commands::check::test(&ctx, &target, &input.read()?)?,
        Commands::Diet { target, file } => commands::check::diet(&ctx, &target, &file)?,
        Commands::Compare { target } => commands::check::compare(&ctx, &target)?,
        Commands::Profile { profiles, action } => {
            commands::profile::run(&ctx, profiles.as_deref(), action)?
        }
    };

    let elapsed = timer.stop();
    tracing::debug!(
        elapsed = %format_duration(elapsed),
        metrics = %mydna_telemetry::metrics().export_json(),
        "Command finished"
    );

    Ok(code)
}

fn init_logging(config: &Config, verbose: bool, format: OutputFormat) {
    let logging = &config.schema.logging;
    let telemetry = TelemetryConfig {
        log_level: logging.level.clone(),
        json: logging.format == mydna_core::config::LogFormat::Json,
        ..TelemetryConfig::default()
    }
    .verbose(verbose);

    if let Err(e) = mydna_telemetry::init_with_config(telemetry) {
        if format == OutputFormat::Text {
            Status::warning(&e.to_string());
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(core) = err.downcast_ref::<mydna_core::Error>() {
        return core.code.exit_code();
    }
    match err.downcast_ref::<MatchError>() {
        Some(MatchError::UnknownProfile(_)) => exit_codes::PROFILE_ERROR,
        Some(MatchError::NoIngredients | MatchError::Json(_)) => exit_codes::VALIDATION_ERROR,
        None => exit_codes::FAILURE,
    }
}

fn report_error(err: &anyhow::Error, format: OutputFormat) {
    match format {
        OutputFormat::Text => match err.downcast_ref::<mydna_core::Error>() {
            Some(core) => Status::error(&core.to_string()),
            None => Status::error(&format!("{:#}", err)),
        },
        OutputFormat::Json => {
            let report = match err.downcast_ref::<mydna_core::Error>() {
                Some(core) => serde_json::to_value(core.to_report()).unwrap_or_default(),
                None => serde_json::json!({ "message": format!("{:#}", err) }),
            };
            eprintln!("{}", serde_json::json!({ "error": report }));
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
