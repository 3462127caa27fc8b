//! hostmetricsd - host metrics collector daemon.
//!
//! Periodically samples the configured sources and emits one reading event
//! per source and pass to the log and, optionally, to a JSON-lines file.

mod error;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use hostmetrics_core::collector::{Collector, RealFs};
use hostmetrics_core::config::{Config, DEFAULT_PROC_PATH, SourceKind};
use hostmetrics_core::metric::registry;
use hostmetrics_core::sink::{EventSink, JsonLinesSink, LogSink};

use crate::error::AppError;

/// Host metrics collector daemon.
#[derive(Parser)]
#[command(name = "hostmetricsd", about = "Host metrics collector daemon", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the collection loop (default).
    Run,
    /// List registered metric definitions.
    ListMetrics,
    /// Fail with a user-facing error carrying MESSAGE.
    #[command(hide = true)]
    TestUserError { message: String },
    /// Fail with an internal error carrying MESSAGE.
    #[command(hide = true)]
    TestInternalError { message: String },
}

#[derive(Args)]
struct RunArgs {
    /// YAML configuration file. Without it the local procfs is sampled with every metric.
    #[arg(short, long, global = true, env = "HOSTMETRICS_CONFIG")]
    config: Option<PathBuf>,

    /// Collection interval in seconds (overrides the configuration).
    #[arg(short, long, global = true)]
    interval: Option<u64>,

    /// Path to /proc filesystem when running without a configuration file.
    #[arg(long, global = true, default_value = DEFAULT_PROC_PATH, conflicts_with = "config")]
    proc_path: String,

    /// Source address when running without a configuration file.
    #[arg(long, global = true, default_value = "localhost", conflicts_with = "config")]
    address: String,

    /// Append events as JSON lines to this file ("-" for stdout).
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Run a single collection pass and exit.
    #[arg(long, global = true)]
    once: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
///
/// Logs go to stdout; stderr carries only the final error line.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["hostmetricsd", "hostmetrics_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stdout)
        .init();
}

fn main() -> ExitCode {
    let result = Cli::try_parse()
        .or_else(|err| {
            if err.use_stderr() {
                Err(AppError::from(err))
            } else {
                // --help and --version
                err.exit()
            }
        })
        .and_then(|cli| {
            init_logging(cli.verbose, cli.quiet);
            dispatch(cli)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let AppError::Internal(ref cause) = err {
                error!("Internal failure: {:?}", cause);
            }
            eprintln!("{}", err.report());
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        None | Some(Command::Run) => run(cli.run),
        Some(Command::ListMetrics) => list_metrics().map_err(AppError::from),
        Some(Command::TestUserError { message }) => Err(AppError::user(message)),
        Some(Command::TestInternalError { message }) => Err(AppError::Internal(anyhow!(message))),
    }
}

fn list_metrics() -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    for definition in registry::all() {
        writeln!(
            out,
            "{:<32}{:<8}{:<12}{}",
            definition.id(),
            definition.category(),
            definition.raw_format(),
            definition.description()
        )
        .context("cannot write metric list")?;
    }
    Ok(())
}

fn open_output(path: &Path) -> Result<Box<dyn Write>, AppError> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::user(format!("cannot open output {}: {}", path.display(), e)))?;
    Ok(Box::new(io::BufWriter::new(file)))
}

fn run(args: RunArgs) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::local(&args.address, &args.proc_path),
    };
    let mut resolved = config.resolve()?;

    if let Some(secs) = args.interval {
        if secs == 0 {
            return Err(AppError::user("--interval must be greater than zero"));
        }
        resolved.interval = Duration::from_secs(secs);
    }
    let interval = resolved.interval;

    info!("hostmetricsd {} starting", env!("CARGO_PKG_VERSION"));
    for source in &resolved.sources {
        let kind = match &source.kind {
            SourceKind::Procfs { proc_path } => format!("procfs at {}", proc_path),
            SourceKind::Static { .. } => "static values".to_string(),
        };
        info!(
            "Source {}: {}, {} metrics",
            source.address,
            kind,
            source.metrics.len()
        );
    }

    let mut collector = resolved.into_collector(RealFs::new());

    let mut sinks: Vec<Box<dyn EventSink>> = vec![Box::new(LogSink)];
    if let Some(path) = &args.output {
        sinks.push(Box::new(JsonLinesSink::new(open_output(path)?)));
        info!("Writing events to {}", path.display());
    }

    if args.once {
        return run_pass(&mut collector, &mut sinks);
    }

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting collection loop, interval={}s", interval.as_secs());

    while running.load(Ordering::SeqCst) {
        let started = Instant::now();
        run_pass(&mut collector, &mut sinks)?;

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval.saturating_sub(started.elapsed());
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutting down after {} passes", collector.pass_count());
    Ok(())
}

fn run_pass(collector: &mut Collector, sinks: &mut [Box<dyn EventSink>]) -> Result<(), AppError> {
    let outcomes = collector.collect_pass();

    if let Some(timing) = collector.last_timing() {
        debug!(
            "Pass #{} took {:?} over {} sources",
            collector.pass_count(),
            timing.total,
            timing.sources.len()
        );
    }

    for sink in sinks.iter_mut() {
        for outcome in &outcomes {
            sink.emit(outcome).context("cannot emit reading event")?;
        }
        sink.flush().context("cannot flush reading events")?;
    }
    Ok(())
}
