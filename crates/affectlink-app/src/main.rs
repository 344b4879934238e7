//! AffectLink Application
//!
//! Entry point for host-side AffectLink sessions. Runs the control loop
//! against simulated vitals and logs telemetry as it is published.
//!
//! # Usage
//!
//! ```bash
//! # Two simulated minutes in realtime (default)
//! affectlink
//!
//! # One accelerated hour with a stress onset halfway through
//! affectlink run --accelerated --duration-secs 3600 --stress-after-secs 1800
//!
//! # Lower the valid-period bar to see sustained alerts sooner
//! affectlink run --accelerated --duration-secs 1200 \
//!     --stress-after-secs 60 --valid-period-cycles 3
//! ```

use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use affectlink_core::{AffectController, AffectState, ControllerConfig};
use affectlink_native::{
    run_accelerated, run_realtime, ChannelTelemetry, ManualClock, SessionSummary, SimProfile,
    SimulatedSensors, StreamError, SystemClock, TelemetryEvent, TelemetryStream,
};

/// AffectLink Application
#[derive(Parser, Debug)]
#[command(name = "affectlink")]
#[command(author, version, about = "AffectLink emotional-state monitor", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulated session (default if no subcommand)
    Run {
        /// Session length in seconds
        #[arg(short, long, default_value = "120")]
        duration_secs: u64,

        /// Drive a manual clock as fast as possible instead of sleeping
        #[arg(short, long)]
        accelerated: bool,

        /// Start the simulated stress response after this many seconds
        #[arg(long)]
        stress_after_secs: Option<u64>,

        /// Consecutive cycles of one category before a valid-period alert
        #[arg(long, default_value = "15")]
        valid_period_cycles: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("AffectLink v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None | Some(Commands::Run { .. }) => run_session(cli.command)?,
    }

    Ok(())
}

/// Run a simulated session and report the outcome
fn run_session(command: Option<Commands>) -> anyhow::Result<()> {
    let (duration_secs, accelerated, stress_after_secs, valid_period_cycles) = match command {
        Some(Commands::Run {
            duration_secs,
            accelerated,
            stress_after_secs,
            valid_period_cycles,
        }) => (duration_secs, accelerated, stress_after_secs, valid_period_cycles),
        None => (120, false, None, 15),
    };

    let profile = match stress_after_secs {
        Some(secs) => {
            info!(onset_secs = secs, "stress response scheduled");
            SimProfile::stressed_after(secs * 1000)
        }
        None => SimProfile::default(),
    };

    let config = ControllerConfig {
        valid_period_cycles,
        ..ControllerConfig::default()
    };
    let duration_ms = duration_secs * 1000;

    info!(duration_secs, accelerated, valid_period_cycles, "starting session");

    let rt = tokio::runtime::Runtime::new()?;
    let (summary, final_state) = rt.block_on(async {
        let sensors = SimulatedSensors::new(profile);
        let sink = ChannelTelemetry::new();
        let monitor = tokio::spawn(monitor_telemetry(sink.subscribe()));

        let result = if accelerated {
            let clock = ManualClock::new();
            let mut controller = AffectController::new(sensors, clock.clone(), sink, config);
            let summary = run_accelerated(&mut controller, &clock, duration_ms).await;
            (summary, controller.state())
        } else {
            let mut controller = AffectController::new(sensors, SystemClock::new(), sink, config);
            let summary = run_realtime(&mut controller, duration_ms).await;
            (summary, controller.state())
        };

        // Dropping the controller closed the telemetry channel
        monitor.await?;
        Ok::<(SessionSummary, AffectState), anyhow::Error>(result)
    })?;

    info!(
        polls = summary.polls,
        heart_rate_samples = summary.heart_rate_samples,
        gsr_samples = summary.gsr_samples,
        cycles = summary.cycles,
        faults = summary.sensor_faults,
        final_state = final_state.as_str(),
        "session summary"
    );

    Ok(())
}

/// Log telemetry events until the publisher goes away
async fn monitor_telemetry(mut stream: TelemetryStream) {
    loop {
        match stream.next_event().await {
            Ok(TelemetryEvent::HeartRateMean(mean)) => info!(mean, "heart-rate mean published"),
            Ok(TelemetryEvent::GsrMean(mean)) => info!(mean, "GSR mean published"),
            Ok(TelemetryEvent::State(state)) => info!(%state, "sustained state published"),
            Ok(TelemetryEvent::Alert(alert)) => warn!(%alert, "alert published"),
            Err(StreamError::Lagged { missed }) => warn!(missed, "telemetry monitor lagged"),
            Err(StreamError::Closed) => break,
        }
    }
}
