// crates/rig-cli/src/main.rs
// ============================================================================
// Module: Rig CLI Entry Point
// Description: Command dispatcher for dispatch runs and rig test sessions.
// Purpose: Provide the operator surface over selection, dispatch, and sessions.
// Dependencies: clap, rig-config, rig-core, rig-exec, rig-hw, tokio.
// ============================================================================

//! ## Overview
//! The CLI exposes two execution layers: `run` fans test sessions out across
//! labeled agents under a global timeout, and `session` runs one rig's
//! acceptance session in place (the surface a dispatched container invokes).
//! Exit codes follow the pytest convention the CI aggregator expects: 0 all
//! passed, 1 failures, 2 usage error, 5 no tests collected.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use rig_config::HarnessConfig;
use rig_core::DispatchReport;
use rig_core::SelectionFilter;
use rig_core::SessionOptions;
use rig_core::SessionRunner;
use rig_core::interfaces::ContainerEngine;
use rig_core::interfaces::SourceCheckout;
use rig_core::runtime::TargetTemplate;
use rig_core::runtime::plan_targets;
use rig_core::runtime::select_agents;
use rig_core::runtime::write_junit;
use rig_core::runtime::write_summary;
use rig_exec::CopyCheckout;
use rig_exec::DockerEngine;
use rig_exec::GitCheckout;
use rig_exec::LocalEngine;
use rig_exec::ParallelDispatcher;
use rig_exec::SystemClock;
use rig_hw::SimulatedLink;
use rig_hw::SimulatedPsu;
use rig_hw::acceptance_suite;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Relative path of the optional session summary artifact.
const SUMMARY_RELATIVE_PATH: &str = "results/summary.rst";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "rig", disable_help_subcommand = true)]
struct Cli {
    /// Log level for CLI diagnostics (error, warn, info, debug, trace).
    #[arg(long = "log-cli-level", value_enum, value_name = "LEVEL", global = true)]
    log_cli_level: Option<LogLevelArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch test sessions across labeled agents.
    Run(RunCommand),
    /// Run one rig's acceptance test session.
    Session(SessionCommand),
    /// Agent inventory utilities.
    Agents {
        /// Selected agents subcommand.
        #[command(subcommand)]
        command: AgentsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to rig.toml or the RIG_CONFIG override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Agent label to dispatch to.
    #[arg(long, value_name = "LABEL")]
    label: String,
    /// Execution engine.
    #[arg(long, value_enum, default_value_t = EngineArg::Local)]
    engine: EngineArg,
    /// Source checkout backend.
    #[arg(long, value_enum, default_value_t = CheckoutArg::Copy)]
    checkout: CheckoutArg,
    /// Repository URL for the git checkout.
    #[arg(long, value_name = "URL")]
    repo: Option<String>,
    /// Branch or tag for the git checkout.
    #[arg(long = "ref", value_name = "REF")]
    reference: Option<String>,
    /// Pre-staged source tree for the copy checkout.
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,
    /// Global dispatch timeout override in minutes.
    #[arg(long, value_name = "MINS")]
    timeout_mins: Option<u64>,
}

/// Configuration for the `session` command.
#[derive(Args, Debug)]
struct SessionCommand {
    /// Rig address to connect to.
    #[arg(long, default_value = "localhost", value_name = "HOST")]
    address: String,
    /// Config file path (defaults to rig.toml or the RIG_CONFIG override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Substring filter on scenario names.
    #[arg(short = 'k', value_name = "EXPR")]
    name_filter: Option<String>,
    /// Run only the given chain positions (index, list, or range).
    #[arg(long, value_name = "POSITIONS", conflicts_with = "exc")]
    inc: Option<String>,
    /// Skip the given chain positions (index, list, or range).
    #[arg(long, value_name = "POSITIONS")]
    exc: Option<String>,
    /// Flash firmware before the other scenarios.
    #[arg(long = "flash-fw", action = ArgAction::SetTrue)]
    flash_fw: bool,
    /// Remote-control the power supply around the session.
    #[arg(long = "control-psu", action = ArgAction::SetTrue)]
    control_psu: bool,
    /// Also write the summary artifact.
    #[arg(long = "generate-doc", action = ArgAction::SetTrue)]
    generate_doc: bool,
    /// Failure output style.
    #[arg(long = "tb", value_enum, default_value_t = TracebackArg::Short)]
    traceback: TracebackArg,
    /// Root directory for result artifacts.
    #[arg(long = "artifact-root", value_name = "PATH", default_value = ".")]
    artifact_root: PathBuf,
}

/// Agents subcommands.
#[derive(Subcommand, Debug)]
enum AgentsCommand {
    /// List agents matching a label.
    List {
        /// Config file path (defaults to rig.toml or the RIG_CONFIG override).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Agent label to match.
        #[arg(long, value_name = "LABEL")]
        label: String,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a harness configuration file.
    Validate {
        /// Config file path (defaults to rig.toml or the RIG_CONFIG override).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Execution engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    /// Docker container per target.
    Docker,
    /// Local process per target.
    Local,
}

/// Checkout backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CheckoutArg {
    /// Shallow git clone per target.
    Git,
    /// Directory copy per target.
    Copy,
}

/// Log level selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational and above.
    Info,
    /// Debug and above.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevelArg {
    /// Returns the tracing filter directive.
    const fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Failure output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TracebackArg {
    /// One line per failed scenario.
    Short,
    /// Every recorded failure with phase detail.
    Long,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying the message shown to the operator.
#[derive(Debug)]
struct CliError {
    /// Message written to stderr.
    message: String,
    /// Exit code for the failure class.
    code: u8,
}

impl CliError {
    /// Builds a runtime error (exit code 1).
    fn runtime(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    /// Builds a usage error (exit code 2).
    fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }
}

/// CLI result alias.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("error: {}", err.message));
            ExitCode::from(err.code)
        }
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_cli_level);

    match cli.command {
        Commands::Run(command) => run_dispatch(command).await,
        Commands::Session(command) => run_session(&command),
        Commands::Agents {
            command: AgentsCommand::List {
                config,
                label,
            },
        } => run_agents_list(config.as_deref(), &label),
        Commands::Config {
            command: ConfigCommand::Validate {
                config,
            },
        } => run_config_validate(config.as_deref()),
    }
}

/// Initializes the tracing subscriber on stderr.
fn init_tracing(level: Option<LogLevelArg>) {
    let directive = level.map_or("warn", LogLevelArg::directive);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// SECTION: Dispatch Command
// ============================================================================

/// Runs the `run` command: select agents, plan targets, dispatch.
async fn run_dispatch(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let agents = config.agent_inventory();
    let selected = select_agents(&agents, &command.label);
    tracing::info!(label = %command.label, count = selected.len(), "selected agents");

    let template = TargetTemplate {
        test_dir: config.runner.test_dir.clone(),
        command: config.runner.command.clone(),
        workdir_root: config.runner.workdir_root.clone(),
        result_path: PathBuf::from(rig_core::JUNIT_RESULT_RELATIVE_PATH),
    };
    let targets = plan_targets(&selected, &template);

    let engine = build_engine(command.engine, &config)?;
    let checkout = build_checkout(&command)?;
    let timeout_mins = command.timeout_mins.unwrap_or(config.runner.timeout_mins);
    let dispatcher = ParallelDispatcher::new(engine, checkout)
        .with_timeout(Duration::from_secs(timeout_mins.saturating_mul(60)));

    let report = dispatcher.dispatch_all(targets).await;
    print_dispatch_report(&report)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Builds the requested engine.
fn build_engine(engine: EngineArg, config: &HarnessConfig) -> CliResult<Arc<dyn ContainerEngine>> {
    match engine {
        EngineArg::Local => Ok(Arc::new(LocalEngine::new())),
        EngineArg::Docker => {
            let image = config
                .runner
                .image
                .clone()
                .ok_or_else(|| CliError::usage("docker engine requires runner.image in config"))?;
            Ok(Arc::new(DockerEngine::new(image)))
        }
    }
}

/// Builds the requested checkout backend.
fn build_checkout(command: &RunCommand) -> CliResult<Arc<dyn SourceCheckout>> {
    match command.checkout {
        CheckoutArg::Git => {
            let repo = command
                .repo
                .clone()
                .ok_or_else(|| CliError::usage("git checkout requires --repo"))?;
            let mut checkout = GitCheckout::new(repo);
            if let Some(reference) = &command.reference {
                checkout = checkout.with_reference(reference.clone());
            }
            Ok(Arc::new(checkout))
        }
        CheckoutArg::Copy => {
            let source = command
                .source
                .clone()
                .ok_or_else(|| CliError::usage("copy checkout requires --source"))?;
            Ok(Arc::new(CopyCheckout::new(source)))
        }
    }
}

/// Prints the dispatch report as JSON.
fn print_dispatch_report(report: &DispatchReport) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(report)
        .map_err(|err| CliError::runtime(format!("report serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::runtime(format!("stdout: {err}")))
}

// ============================================================================
// SECTION: Session Command
// ============================================================================

/// Runs the `session` command against one rig.
fn run_session(command: &SessionCommand) -> CliResult<ExitCode> {
    let filter =
        SelectionFilter::from_expressions(command.inc.as_deref(), command.exc.as_deref())
            .map_err(|err| CliError::usage(err.to_string()))?;

    let config = load_config(command.config.as_deref())?;
    let chain = config
        .robots
        .iter()
        .find(|robot| robot.address == command.address)
        .map(|robot| robot.chain.iter().map(rig_config::DeviceConfig::to_device).collect::<Vec<_>>())
        .unwrap_or_default();
    if chain.is_empty() {
        tracing::warn!(address = %command.address, "no robot configured for address; chain is empty");
    }
    let expected = if chain.is_empty() { None } else { Some(chain.len()) };

    let node_count = u64::try_from(chain.len()).unwrap_or(u64::MAX);
    let link = SimulatedLink::new(chain);
    let psu = SimulatedPsu::new(node_count);

    let mut options = SessionOptions::new(command.address.as_str());
    options.name_filter = command.name_filter.clone();
    options.filter = filter;
    options.control_psu = command.control_psu;
    options.flash_firmware = command.flash_fw;

    let clock = SystemClock;
    let runner = SessionRunner::new(&link, Some(&psu), &clock, options);
    let report = runner
        .run(acceptance_suite(expected))
        .map_err(|err| CliError::runtime(err.to_string()))?;

    let junit_path = write_junit(&report, &command.artifact_root)
        .map_err(|err| CliError::runtime(err.to_string()))?;
    tracing::info!(path = %junit_path.display(), "wrote result artifact");
    if command.generate_doc {
        let summary_path = command.artifact_root.join(SUMMARY_RELATIVE_PATH);
        write_summary(&report, &summary_path)
            .map_err(|err| CliError::runtime(err.to_string()))?;
    }

    print_session_outcome(&report, command.traceback)?;
    Ok(ExitCode::from(report.exit_status().code()))
}

/// Prints the session outcome in the selected traceback style.
fn print_session_outcome(
    report: &rig_core::SessionReport,
    traceback: TracebackArg,
) -> CliResult<()> {
    for result in &report.results {
        let label = match result.status {
            rig_core::ScenarioStatus::Passed => "PASS",
            rig_core::ScenarioStatus::Failed => "FAIL",
            rig_core::ScenarioStatus::Skipped => "SKIP",
        };
        write_stdout_line(&format!("{label} {}", result.scenario_id))
            .map_err(|err| CliError::runtime(format!("stdout: {err}")))?;
        if traceback == TracebackArg::Long {
            for failure in &result.failures {
                write_stdout_line(&format!("    {}: {}", failure.action, failure.message))
                    .map_err(|err| CliError::runtime(format!("stdout: {err}")))?;
            }
        }
    }
    let summary = format!(
        "{} passed, {} failed, {} skipped",
        report.count(rig_core::ScenarioStatus::Passed),
        report.count(rig_core::ScenarioStatus::Failed),
        report.count(rig_core::ScenarioStatus::Skipped),
    );
    write_stdout_line(&summary).map_err(|err| CliError::runtime(format!("stdout: {err}")))
}

// ============================================================================
// SECTION: Inventory and Config Commands
// ============================================================================

/// Runs the `agents list` command.
fn run_agents_list(config: Option<&std::path::Path>, label: &str) -> CliResult<ExitCode> {
    let config = load_config(config)?;
    let agents = config.agent_inventory();
    for agent_id in select_agents(&agents, label) {
        write_stdout_line(agent_id.as_str())
            .map_err(|err| CliError::runtime(format!("stdout: {err}")))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the `config validate` command.
fn run_config_validate(config: Option<&std::path::Path>) -> CliResult<ExitCode> {
    load_config(config)?;
    write_stdout_line("configuration OK")
        .map_err(|err| CliError::runtime(format!("stdout: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration, mapping failures to usage errors.
fn load_config(path: Option<&std::path::Path>) -> CliResult<HarnessConfig> {
    rig_config::load(path).map_err(|err| CliError::usage(err.to_string()))
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
