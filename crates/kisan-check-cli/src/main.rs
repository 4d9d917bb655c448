// crates/kisan-check-cli/src/main.rs
// ============================================================================
// Module: Kisan Check CLI Entry Point
// Description: Command dispatcher for the farmer registry conformance checker.
// Purpose: Run the checklist, print localized results, and map them to an exit code.
// Dependencies: clap, kisan-check-core, thiserror, tracing, tracing-subscriber.
// ============================================================================

//! ## Overview
//! `kisan-check` resolves layered configuration, runs every conformance check
//! against the target registry, prints one line per result plus a summary,
//! and exits `0` only when every check passed. All user-facing strings are
//! routed through the i18n catalog.
//!
//! Security posture: registry responses are untrusted and only echoed back as
//! diagnostics; configuration fails closed before any request is sent.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use kisan_check_cli::i18n::Locale;
use kisan_check_cli::i18n::set_locale;
use kisan_check_cli::t;
use kisan_check_core::CaseResult;
use kisan_check_core::CheckId;
use kisan_check_core::CheckerConfig;
use kisan_check_core::ConfigOverrides;
use kisan_check_core::FarmerApiClient;
use kisan_check_core::RunObserver;
use kisan_check_core::TestResult;
use kisan_check_core::TestRun;
use kisan_check_core::run_conformance;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "KISAN_CHECK_LANG";
/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Log filter used with `--verbose`.
const VERBOSE_LOG_FILTER: &str = "kisan_check_core=debug,kisan_check=debug,warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "kisan-check", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `KISAN_CHECK_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Emit debug diagnostics (requests, latencies) on stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
    /// Selected subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every conformance check against the registry.
    Run(RunCommand),
    /// List the conformance checks in execution order.
    Checks,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
struct RunCommand {
    /// Registry base URL (overrides config file and `KISAN_CHECK_BASE_URL`).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in seconds (overrides `KISAN_CHECK_TIMEOUT_SEC`).
    #[arg(long, value_name = "SECONDS")]
    timeout_secs: Option<u64>,
    /// Optional TOML config file (overrides `KISAN_CHECK_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write a canonical JSON report to this path.
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
    /// Write a Markdown summary to this path.
    #[arg(long, value_name = "PATH")]
    report_markdown: Option<PathBuf>,
}

impl RunCommand {
    /// Converts command flags into configuration overrides.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Hindi.
    Hi,
}

/// Converts CLI language selections into catalog locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Hi => Self::Hi,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    init_logging(cli.verbose)?;

    match cli.command.unwrap_or_else(|| Commands::Run(RunCommand::default())) {
        Commands::Run(command) => command_run(&command),
        Commands::Checks => command_checks(),
    }
}

/// Installs the stderr diagnostic subscriber.
fn init_logging(verbose: bool) -> CliResult<()> {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = CheckerConfig::load(&command.overrides())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    tracing::debug!(
        api_root = %config.api_root(),
        timeout_secs = config.timeout().as_secs(),
        "configuration resolved"
    );
    let client = FarmerApiClient::new(&config)
        .map_err(|err| CliError::new(t!("client.init_failed", error = err)))?;

    write_stdout_line(&t!("run.header", target = config.api_root()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    let mut observer = ConsoleObserver::default();
    let run = run_conformance(&client, &mut observer);
    if let Some(err) = observer.write_error {
        return Err(CliError::new(output_error("stdout", &err)));
    }

    write_summary(&run)?;
    write_reports(command, &run)?;
    Ok(ExitCode::from(run.exit_status()))
}

/// Prints progress and results as the checklist runs.
#[derive(Default)]
struct ConsoleObserver {
    /// First stdout failure; later writes are skipped once set.
    write_error: Option<std::io::Error>,
}

impl ConsoleObserver {
    /// Writes a line unless an earlier write already failed.
    fn line(&mut self, message: &str) {
        if self.write_error.is_some() {
            return;
        }
        if let Err(err) = write_stdout_line(message) {
            self.write_error = Some(err);
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn check_started(&mut self, check: CheckId) {
        self.line(&t!("run.check.started", name = check_title(check)));
    }

    fn check_finished(&mut self, result: &TestResult) {
        self.line(&t!(
            "run.check.result",
            status = status_label(result.passed),
            name = check_title(result.check),
            message = result.message
        ));
        for case in &result.sub_results {
            self.line(&case_line(case));
        }
        for warning in &result.warnings {
            self.line(&t!("run.check.warning", warning = warning));
        }
    }
}

/// Formats one validation case line.
fn case_line(case: &CaseResult) -> String {
    t!(
        "run.case.result",
        status = status_label(case.passed),
        name = case.name,
        message = case.message
    )
}

/// Prints the pass/fail tally and the verdict.
fn write_summary(run: &TestRun) -> CliResult<()> {
    let summary = run.summary();
    let mut lines = vec![
        String::new(),
        t!("run.summary", passed = summary.passed, total = summary.total),
    ];
    if summary.warnings > 0 {
        lines.push(t!("run.summary.warnings", count = summary.warnings));
    }
    lines.push(if summary.succeeded() { t!("run.verdict.pass") } else { t!("run.verdict.fail") });
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Writes the optional report artifacts.
fn write_reports(command: &RunCommand, run: &TestRun) -> CliResult<()> {
    if command.report_json.is_none() && command.report_markdown.is_none() {
        return Ok(());
    }
    let report = run.report().map_err(|err| CliError::new(t!("report.failed", error = err)))?;
    if let Some(path) = &command.report_json {
        report.write_json(path).map_err(|err| CliError::new(t!("report.failed", error = err)))?;
        write_stdout_line(&t!("report.json.ok", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    if let Some(path) = &command.report_markdown {
        report
            .write_markdown(path)
            .map_err(|err| CliError::new(t!("report.failed", error = err)))?;
        write_stdout_line(&t!("report.markdown.ok", path = path.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Checks Command
// ============================================================================

/// Executes the `checks` command.
fn command_checks() -> CliResult<ExitCode> {
    for (index, check) in CheckId::ALL.iter().enumerate() {
        write_stdout_line(&t!(
            "checks.line",
            index = index + 1,
            key = check.key(),
            title = check_title(*check)
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Returns the localized title of `check`.
fn check_title(check: CheckId) -> String {
    match check {
        CheckId::HealthCheck => t!("check.health_check"),
        CheckId::GetFarmersEmpty => t!("check.get_farmers_empty"),
        CheckId::DbConnection => t!("check.db_connection"),
        CheckId::FarmerRegistration => t!("check.farmer_registration"),
        CheckId::DuplicateCheck => t!("check.duplicate_check"),
        CheckId::Validation => t!("check.validation"),
        CheckId::GetFarmersWithData => t!("check.get_farmers_with_data"),
    }
}

/// Returns the localized PASS/FAIL label.
fn status_label(passed: bool) -> String {
    if passed { t!("run.status.pass") } else { t!("run.status.fail") }
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
