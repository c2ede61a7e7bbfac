// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;
mod helpers;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Generator, Shell};
use hedsuite_core::{
    resolve_active_config_path, resolve_config_path, ConfigPathScope, ExitCode, MachineError,
    SuiteConfig, ENV_HEDSUITE_LOG_JSON, ENV_HEDSUITE_LOG_LEVEL,
};
use hedsuite_report::IndexFormat;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const CRATE_NAME: &str = "hedsuite-cli";

const HEDSUITE_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "hedsuite")]
#[command(version)]
#[command(about = "HED test-suite consolidation and reporting")]
#[command(help_template = HEDSUITE_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  HEDSUITE_LOG_LEVEL       Log filter override (e.g. debug)\n  HEDSUITE_LOG_JSON        Emit JSON log lines when set to 1\n  HEDSUITE_CONFIG          Suite config file\n  HEDSUITE_TEST_DATA_DIR   Test data root override"
)]
pub struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long = "print-config-paths", default_value_t = false)]
    print_config_paths: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge per-code test files into category artifacts and dictionaries.
    Consolidate {
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Check test files against the Draft-7 test schema.
    ValidateStructure {
        dir: Option<PathBuf>,
        #[arg(long, conflicts_with = "dir")]
        file: Option<PathBuf>,
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Per-error-code coverage over the consolidated corpus.
    Coverage {
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
    /// Searchable index of every consolidated test case.
    Index {
        #[arg(long, default_value = "docs/test_index.md")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = IndexFormatCli::Markdown)]
        format: IndexFormatCli,
    },
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexFormatCli {
    Markdown,
    Json,
}

impl From<IndexFormatCli> for IndexFormat {
    fn from(value: IndexFormatCli) -> Self {
        match value {
            IndexFormatCli::Markdown => Self::Markdown,
            IndexFormatCli::Json => Self::Json,
        }
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success.code()),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code.code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage(
                    MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                ));
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    if cli.print_config_paths {
        emit_config_paths(cli.config.clone(), output_mode.json).map_err(CliError::internal)?;
        return Ok(());
    }

    let command = cli.command.ok_or_else(|| {
        CliError::usage(MachineError::new("usage_error", "missing command; see --help"))
    })?;
    let log_flags = LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
    };
    let config_path = cli.config;
    let prepare = || {
        init_tracing(log_flags);
        load_config(config_path.clone())
    };

    match command {
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
        Commands::Consolidate { dry_run } => {
            commands::run_consolidate(&prepare()?, dry_run, log_flags, output_mode)
        }
        Commands::ValidateStructure { dir, file, schema } => commands::run_validate_structure(
            &prepare()?,
            dir,
            file,
            schema,
            log_flags,
            output_mode,
        ),
        Commands::Coverage { markdown } => {
            commands::run_coverage(&prepare()?, markdown, output_mode)
        }
        Commands::Index { output, format } => {
            commands::run_index(&prepare()?, output, format.into(), output_mode)
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct LogFlags {
    quiet: bool,
    verbose: u8,
    trace: bool,
}

impl LogFlags {
    pub(crate) fn is_verbose(self) -> bool {
        self.verbose > 0 || self.trace
    }

    fn default_directive(self) -> &'static str {
        if self.trace {
            "trace"
        } else if self.verbose > 1 {
            "debug"
        } else if self.verbose == 1 {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

fn log_filter(log_flags: LogFlags) -> EnvFilter {
    if let Ok(level) = std::env::var(ENV_HEDSUITE_LOG_LEVEL) {
        if let Ok(filter) = EnvFilter::try_new(level.trim()) {
            return filter;
        }
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_flags.default_directive()))
}

fn init_tracing(log_flags: LogFlags) {
    let filter = log_filter(log_flags);
    let log_json = std::env::var(ENV_HEDSUITE_LOG_JSON).is_ok_and(|v| v.trim() == "1");
    // stdout carries command output only.
    let result = if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("failed to install log subscriber: {err}");
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<SuiteConfig, CliError> {
    let path = resolve_active_config_path(explicit);
    let config = SuiteConfig::resolve(path.as_deref()).map_err(|e| {
        CliError::usage(MachineError::new("config_error", &e.to_string()).with_detail(
            "path",
            &path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ))
    })?;
    tracing::debug!(
        config = ?path,
        test_data_dir = %config.test_data_dir.display(),
        "suite config resolved"
    );
    Ok(config)
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

fn emit_config_paths(explicit: Option<PathBuf>, machine_json: bool) -> Result<(), String> {
    let payload = json!({
        "workspace_config": resolve_config_path(ConfigPathScope::Workspace),
        "user_config": resolve_config_path(ConfigPathScope::User),
        "active_config": resolve_active_config_path(explicit),
    });
    helpers::emit_ok(OutputMode { json: machine_json }, payload)
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_failed", message),
        }
    }

    fn usage(machine: MachineError) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine,
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
