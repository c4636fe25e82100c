// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod compliance_commands;
mod inputs;
mod output;
mod policy_commands;
mod render_commands;
mod store_commands;

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use aiact_core::{resolve_aiact_config_path, ConfigPathScope, ExitCode, MachineError};
use clap::{error::ErrorKind, ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

pub const CRATE_NAME: &str = "aiact-cli";

#[derive(Parser)]
#[command(name = "aiact")]
#[command(version, about = "AI Act compliance scoring and certification CLI")]
#[command(
    after_help = "Environment:\n  AIACT_LOG_LEVEL    Log verbosity override\n  AIACT_CONFIG_DIR   User configuration directory"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long = "print-config-paths", default_value_t = false)]
    print_config_paths: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project score, level and status for a system snapshot.
    Score {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Issue a certificate for a qualifying snapshot.
    Issue {
        #[command(flatten)]
        input: SnapshotArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Render {
        #[command(subcommand)]
        command: RenderCommand,
    },
    Policy {
        #[command(subcommand)]
        command: PolicyCommand,
    },
    Openapi {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
}

#[derive(clap::Args)]
pub(crate) struct SnapshotArgs {
    #[arg(long)]
    pub snapshot: PathBuf,
    #[arg(long)]
    pub policy: Option<PathBuf>,
    /// Evaluation instant (RFC 3339); defaults to now.
    #[arg(long)]
    pub at: Option<String>,
    /// Tenant to act as; defaults to the snapshot's organization.
    #[arg(long)]
    pub organization: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum BadgeStyleCli {
    Standard,
    Compact,
    Detailed,
}

#[derive(Subcommand)]
enum RenderCommand {
    /// Badge SVG; without a certificate the "not found" placeholder is drawn.
    Badge {
        #[arg(long)]
        certificate: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = BadgeStyleCli::Standard)]
        style: BadgeStyleCli,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    CertificatePdf {
        #[arg(long)]
        certificate: PathBuf,
        /// Evaluation instant (RFC 3339); past validity stamps the PDF as expired.
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
    DocumentPdf {
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum PolicyCommand {
    Validate {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Canonical policy JSON and its hash.
    Print {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Every rule finding, including warnings and notes.
    Explain {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StoreCommand {
    /// Load a JSON array of snapshots into a SQLite store.
    Seed {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        snapshots: PathBuf,
    },
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    pub(crate) fn validation(code: &str, message: impl ToString) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new(code, message.to_string()),
        }
    }

    pub(crate) fn dependency(message: impl ToString) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", message.to_string()),
        }
    }

    pub(crate) fn internal(message: impl ToString) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", message.to_string()),
        }
    }

    #[must_use]
    pub(crate) fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            emit_error(&err, wants_json);
            err.exit_code.into()
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
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()))
            }
        },
    };
    init_logging(cli.quiet, cli.verbose);
    let output_mode = OutputMode { json: cli.json };
    if cli.print_config_paths {
        return output::emit_ok(
            output_mode,
            json!({
                "user": resolve_aiact_config_path(ConfigPathScope::User),
                "workspace": resolve_aiact_config_path(ConfigPathScope::Workspace),
            }),
        );
    }

    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    match command {
        Commands::Score { input } => compliance_commands::run_score(&input, output_mode),
        Commands::Issue { input, out } => {
            compliance_commands::run_issue(&input, out.as_deref(), output_mode)
        }
        Commands::Render { command } => match command {
            RenderCommand::Badge {
                certificate,
                style,
                at,
                out,
            } => render_commands::run_badge(
                certificate.as_deref(),
                style,
                at.as_deref(),
                out.as_deref(),
            ),
            RenderCommand::CertificatePdf {
                certificate,
                at,
                out,
            } => render_commands::run_certificate_pdf(
                &certificate,
                at.as_deref(),
                &out,
                output_mode,
            ),
            RenderCommand::DocumentPdf { request, out } => {
                render_commands::run_document_pdf(&request, &out, output_mode)
            }
        },
        Commands::Policy { command } => match command {
            PolicyCommand::Validate { path } => {
                policy_commands::run_validate(path.as_deref(), output_mode)
            }
            PolicyCommand::Print { path } => policy_commands::run_print(path.as_deref(), output_mode),
            PolicyCommand::Explain { path } => {
                policy_commands::run_explain(path.as_deref(), output_mode)
            }
        },
        Commands::Openapi { out } => output::run_openapi(out.as_deref(), output_mode),
        Commands::Store { command } => match command {
            StoreCommand::Seed { db, snapshots } => {
                store_commands::run_seed(&db, &snapshots, output_mode)
            }
        },
    }
}

/// Logs go to stderr so stdout stays machine readable.
fn init_logging(quiet: bool, verbose: u8) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => std::env::var(aiact_core::ENV_AIACT_LOG_LEVEL)
            .ok()
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("info"),
        (false, _) => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
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
