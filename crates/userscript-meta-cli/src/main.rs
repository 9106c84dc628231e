// crates/userscript-meta-cli/src/main.rs
// ============================================================================
// Module: Userscript Metadata CLI
// Description: CLI entrypoint for header generation and drift checks.
// Purpose: Render userscript headers from JSON metadata files.
// Dependencies: clap, tracing-subscriber, userscript-meta-cli
// ============================================================================

//! ## Overview
//! `userscript-meta generate` prints or writes the header for a metadata
//! file. `userscript-meta check` fails when a script no longer starts with
//! the header its metadata produces. Logs go to stderr, filtered by
//! `USERSCRIPT_META_LOG`.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;
use userscript_meta_cli::CliError;
use userscript_meta_cli::DEFAULT_LOG_FILTER;
use userscript_meta_cli::LOG_ENV_VAR;
use userscript_meta_cli::OutputOverrides;
use userscript_meta_cli::check_script;
use userscript_meta_cli::render_header;
use userscript_meta_cli::write_output;
use userscript_meta_core::CommentStyle;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// CLI arguments for header generation.
#[derive(Debug, Parser)]
#[command(name = "userscript-meta", about = "Generate userscript metadata headers.")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Render the header for a metadata file.
    Generate {
        /// Shared rendering inputs.
        #[command(flatten)]
        render: RenderArgs,
        /// Output file; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Verify a script starts with the header its metadata produces.
    Check {
        /// Shared rendering inputs.
        #[command(flatten)]
        render: RenderArgs,
        /// Script to verify.
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
    },
}

/// Inputs shared by every subcommand.
#[derive(Debug, Args)]
struct RenderArgs {
    /// JSON metadata file.
    #[arg(long, value_name = "FILE")]
    meta: PathBuf,
    /// Configuration file; defaults to `userscript-meta.toml` when present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Comment style: block, slashes, or none.
    #[arg(long, value_name = "STYLE")]
    comment_style: Option<CommentStyle>,
    /// Omit the `==UserScript==` markers.
    #[arg(long)]
    no_block: bool,
}

impl RenderArgs {
    /// Renders the header described by these arguments.
    fn render(&self) -> Result<String, CliError> {
        let overrides = OutputOverrides {
            comment_style: self.comment_style,
            no_block: self.no_block,
        };
        render_header(&self.meta, self.config.as_deref(), overrides)
    }
}

// ============================================================================
// SECTION: Command Dispatch
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Dispatches the CLI command.
fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            render,
            out,
        } => {
            let header = render.render()?;
            match out {
                Some(path) => write_output(&path, &format!("{header}\n")),
                None => write_stdout(&header),
            }
        }
        Command::Check {
            render,
            script,
        } => {
            let header = render.render()?;
            check_script(&script, &header)
        }
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Writes the header to stdout.
fn write_stdout(header: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{header}").map_err(|err| CliError::Io(err.to_string()))
}

/// Reports a CLI error to stderr.
fn report_error(err: &CliError) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{err}");
    ExitCode::FAILURE
}
