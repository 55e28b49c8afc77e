//! Simulation Miner Core - distribution mining CLI
//!
//! The entry point for sm-core, handling:
//! - Loading an event log (JSON form of `EventLog`)
//! - Activity/resource duration mining
//! - Case inter-arrival mining
//! - The activity resource roster

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use sm_common::{ActivityReport, EventLog, OutputFormat, ResourceReport, SCHEMA_VERSION};
use sm_core::config::{load_config, ConfigError, ConfigOptions, MiningConfig, MiningMode};
use sm_core::exit_codes::ExitCode;
use sm_core::extract::activity_roster;
use sm_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use sm_core::mining::{mine_activity_durations, mine_inter_arrival, mine_resource_durations};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Simulation Miner Core - fit parametric distributions to event logs
#[derive(Parser)]
#[command(name = "sm-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (JSON or TOML); overrides SM_CONFIG and the XDG location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit one duration distribution per activity (or per resource and activity)
    Durations(DurationsArgs),

    /// Fit the distribution of gaps between case arrivals
    InterArrival(InterArrivalArgs),

    /// List the resources that performed each activity
    Roster(RosterArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Durations(_) => "durations",
            Commands::InterArrival(_) => "inter-arrival",
            Commands::Roster(_) => "roster",
        }
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Fitting flags shared by the mining commands.
#[derive(Args, Debug, Default)]
struct FitArgs {
    /// Drop observations outside the Tukey fences before fitting
    #[arg(long)]
    remove_outliers: bool,

    /// Synthetic draws per candidate (default: one per observation)
    #[arg(long)]
    samples: Option<usize>,

    /// Seed for candidate sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Fit keys one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct DurationsArgs {
    /// Event log file
    #[arg(long)]
    log: PathBuf,

    /// Group durations by activity or by resource
    #[arg(long)]
    mode: Option<MiningMode>,

    /// Keep only observations closed by this resource (repeatable)
    #[arg(long = "resource")]
    resources: Vec<String>,

    #[command(flatten)]
    fit: FitArgs,
}

#[derive(Args, Debug)]
struct InterArrivalArgs {
    /// Event log file
    #[arg(long)]
    log: PathBuf,

    #[command(flatten)]
    fit: FitArgs,
}

#[derive(Args, Debug)]
struct RosterArgs {
    /// Event log file
    #[arg(long)]
    log: PathBuf,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id, command = cli.command.name());
    let exit_code = span.in_scope(|| {
        tracing::info!(
            event = event_names::RUN_STARTED,
            command = cli.command.name(),
            "starting"
        );
        let ctx = RunContext {
            global: &cli.global,
            run_id: &run_id,
            command: cli.command.name(),
        };
        let code = match &cli.command {
            Commands::Durations(args) => run_durations(&ctx, args),
            Commands::InterArrival(args) => run_inter_arrival(&ctx, args),
            Commands::Roster(args) => run_roster(&ctx, args),
        };
        tracing::info!(
            event = event_names::RUN_FINISHED,
            exit_code = code.as_i32(),
            status = code.code_name(),
            "finished"
        );
        code
    });

    std::process::exit(exit_code.as_i32());
}

/// Per-invocation data shared by the command handlers.
struct RunContext<'a> {
    global: &'a GlobalOpts,
    run_id: &'a str,
    command: &'static str,
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_durations(ctx: &RunContext<'_>, args: &DurationsArgs) -> ExitCode {
    let mut config = match resolve_config(ctx.global, &args.fit) {
        Ok(config) => config,
        Err(e) => return output_config_error(ctx, &e),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if !args.resources.is_empty() {
        config.resource_filter = Some(args.resources.iter().cloned().collect());
    }
    if let Err(e) = config.validate() {
        return output_config_error(ctx, &e);
    }

    let log = match read_log(&args.log) {
        Ok(log) => log,
        Err(e) => return output_input_error(ctx, &args.log, &e),
    };

    let span = tracing::info_span!("mine", stage = %Stage::Fit);
    let _guard = span.enter();

    match config.mode {
        MiningMode::Activity => {
            let report = mine_activity_durations(&log, &config);
            let code = ExitCode::for_outcome(report.distributions.len(), report.failures.len());
            let lines = activity_lines(&report, "");
            emit(ctx, code, serde_json::to_value(&report), lines)
        }
        MiningMode::Resource => {
            let report = mine_resource_durations(&log, &config);
            let failed = report.resources.values().map(|r| r.failures.len()).sum();
            let code = ExitCode::for_outcome(report.fitted_count(), failed);
            let lines = resource_lines(&report);
            emit(ctx, code, serde_json::to_value(&report), lines)
        }
    }
}

fn run_inter_arrival(ctx: &RunContext<'_>, args: &InterArrivalArgs) -> ExitCode {
    let config = match resolve_config(ctx.global, &args.fit) {
        Ok(config) => config,
        Err(e) => return output_config_error(ctx, &e),
    };
    let log = match read_log(&args.log) {
        Ok(log) => log,
        Err(e) => return output_input_error(ctx, &args.log, &e),
    };

    let span = tracing::info_span!("mine", stage = %Stage::Fit);
    let _guard = span.enter();

    match mine_inter_arrival(&log, &config) {
        Ok(mined) => {
            let report = mined.report();
            let line = format!(
                "inter-arrival: {} {} ({} arrivals)",
                report.arrival_time_distribution.distribution_name,
                format_values(mined.fit.parameters.model_values()),
                mined.arrivals
            );
            let result = serde_json::to_value(&report).map(|mut value| {
                if let Value::Object(map) = &mut value {
                    map.insert("arrivals".into(), mined.arrivals.into());
                    map.insert(
                        "traces_without_start".into(),
                        mined.traces_without_start.into(),
                    );
                }
                value
            });
            emit(ctx, ExitCode::Clean, result, vec![line])
        }
        Err(e) => output_error(
            ctx,
            ExitCode::NothingFitted,
            e.code(),
            &e.to_string(),
            Some(e.remediation()),
        ),
    }
}

fn run_roster(ctx: &RunContext<'_>, args: &RosterArgs) -> ExitCode {
    let log = match read_log(&args.log) {
        Ok(log) => log,
        Err(e) => return output_input_error(ctx, &args.log, &e),
    };

    let roster = activity_roster(&log);
    let lines = roster
        .roles
        .iter()
        .map(|(activity, resources)| {
            let names: Vec<&str> = resources.iter().map(String::as_str).collect();
            format!("{}: {}", activity, names.join(", "))
        })
        .collect();
    emit(ctx, ExitCode::Clean, serde_json::to_value(&roster), lines)
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve file configuration and apply the fitting flags on top.
fn resolve_config(global: &GlobalOpts, fit: &FitArgs) -> Result<MiningConfig, ConfigError> {
    let span = tracing::debug_span!("config", stage = %Stage::Init);
    let _guard = span.enter();

    let options = ConfigOptions {
        config_path: global.config.clone(),
        config_dir: None,
    };
    let mut config = load_config(&options)?.config;

    if fit.remove_outliers {
        config.fit.remove_outliers = true;
    }
    if fit.samples.is_some() {
        config.fit.sample_count = fit.samples;
    }
    if let Some(seed) = fit.seed {
        config.fit.seed = seed;
    }
    if fit.sequential {
        config.parallel = false;
    }
    config.validate()?;
    Ok(config)
}

fn read_log(path: &Path) -> sm_common::Result<EventLog> {
    let span = tracing::info_span!("read_log", stage = %Stage::Extract);
    let _guard = span.enter();

    let file = File::open(path)?;
    let log = EventLog::from_reader(BufReader::new(file))?;
    tracing::debug!(
        traces = log.len(),
        events = log.event_count(),
        path = %path.display(),
        "event log loaded"
    );
    Ok(log)
}

fn format_values(values: impl Iterator<Item = f64>) -> String {
    let parts: Vec<String> = values.map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", parts.join(", "))
}

fn activity_lines(report: &ActivityReport, prefix: &str) -> Vec<String> {
    let fitted = report.distributions.iter().map(|(key, fit)| {
        let params: Vec<String> = fit
            .parameters
            .model
            .iter()
            .map(|p| format!("{}={:.4}", p.name, p.value))
            .collect();
        format!(
            "{}{}: {} {}",
            prefix,
            key,
            fit.distribution_name,
            params.join(" ")
        )
    });
    let failed = report
        .failures
        .iter()
        .map(|(key, reason)| format!("{}{}: FAILED ({})", prefix, key, reason));
    fitted.chain(failed).collect()
}

fn resource_lines(report: &ResourceReport) -> Vec<String> {
    report
        .resources
        .iter()
        .flat_map(|(resource, activities)| activity_lines(activities, &format!("{} / ", resource)))
        .collect()
}

/// Write a successful payload to stdout.
fn emit(
    ctx: &RunContext<'_>,
    code: ExitCode,
    result: serde_json::Result<Value>,
    summary: Vec<String>,
) -> ExitCode {
    let span = tracing::debug_span!("report", stage = %Stage::Report);
    let _guard = span.enter();

    let result = match result {
        Ok(result) => result,
        Err(e) => return output_internal_error(ctx, &e),
    };

    match ctx.global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "command": ctx.command,
                "status": code.code_name(),
                "result": result,
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{}", text),
                Err(e) => return output_internal_error(ctx, &e),
            }
        }
        OutputFormat::Summary => {
            for line in summary {
                println!("{}", line);
            }
        }
    }
    code
}

fn output_config_error(ctx: &RunContext<'_>, error: &ConfigError) -> ExitCode {
    tracing::error!(event = event_names::CONFIG_ERROR, error = %error, "configuration rejected");
    let error_code = match error {
        ConfigError::NotFound { .. } => 31,
        ConfigError::Parse { .. } | ConfigError::Validation(_) => 30,
        ConfigError::Io { .. } => 60,
    };
    output_error(
        ctx,
        ExitCode::ArgsError,
        error_code,
        &error.to_string(),
        Some("Check the configuration file syntax and values."),
    )
}

fn output_input_error(ctx: &RunContext<'_>, path: &Path, error: &sm_common::Error) -> ExitCode {
    tracing::error!(
        event = event_names::INPUT_ERROR,
        path = %path.display(),
        code = error.code(),
        error = %error,
        "event log unreadable"
    );
    output_error(
        ctx,
        ExitCode::InputError,
        error.code(),
        &format!("{}: {}", path.display(), error),
        Some(error.remediation()),
    )
}

fn output_internal_error(ctx: &RunContext<'_>, error: &dyn std::fmt::Display) -> ExitCode {
    tracing::error!(event = event_names::INTERNAL_ERROR, error = %error, "internal error");
    eprintln!("[{}] {} internal error: {}", ctx.run_id, ctx.command, error);
    ExitCode::InternalError
}

/// Output an error in the appropriate format on stderr.
fn output_error(
    ctx: &RunContext<'_>,
    exit_code: ExitCode,
    error_code: u32,
    message: &str,
    remediation: Option<&str>,
) -> ExitCode {
    match ctx.global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "command": ctx.command,
                "status": exit_code.code_name(),
                "error": {
                    "code": error_code,
                    "message": message,
                    "remediation": remediation,
                }
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("{}", response),
            }
        }
        OutputFormat::Summary => {
            eprintln!("[{}] {} error: {}", ctx.run_id, ctx.command, message);
        }
    }
    exit_code
}
