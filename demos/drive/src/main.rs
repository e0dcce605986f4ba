//! `rt-drive` — plan a route, reroute around severe incidents, and drive it.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: delivery run past the built-in incident feed
//! cargo run -p rt-drive
//!
//! # Config file, no network, CSV telemetry
//! cargo run -p rt-drive -- --config demos/drive/drive.json --offline --output out/
//!
//! # School run through the default pickup stops
//! cargo run -p rt-drive -- --mode school
//!
//! # Report a closure, then route around it on a service that accepts
//! # point exclusions
//! cargo run -p rt-drive -- --osrm-url http://localhost:5000 --avoid-severe \
//!     --report closure@11.003,76.004
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (default: `info`)

mod config;
mod feed;
mod offline;
mod progress;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rt_core::{Clock, GeoPoint, SimRng, SystemClock, TravelMode};
use rt_output::{CsvWriter, TelemetryObserver};
use rt_routing::{
    OsrmTransport, RerouteEvaluator, RerouteOutcome, RouteProvider, RouteRequest,
    RoutingTransport,
};
use rt_sim::{spawn_drive, BandedSpeed, DriveHandle, DriveObserver, DriveSimulator, DriveSummary};
use rt_traffic::{default_seed, load_seed_csv, IncidentStore};

use crate::config::{parse_point, AppConfig, ReportSpec};
use crate::feed::spawn_feed;
use crate::offline::OfflineTransport;
use crate::progress::ProgressLog;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "JSON config file; flags override its values")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Travel mode: delivery, school, or emergency")]
    mode: Option<TravelMode>,

    #[arg(long, value_parser = parse_point, help = "Start point as lat,lon")]
    start: Option<GeoPoint>,

    #[arg(long, value_parser = parse_point, help = "End point as lat,lon")]
    end: Option<GeoPoint>,

    #[arg(long = "via", value_parser = parse_point, help = "Waypoint as lat,lon (repeatable, visited in order)")]
    waypoints: Vec<GeoPoint>,

    #[arg(long, help = "Ask the router to avoid severe incidents")]
    avoid_severe: bool,

    #[arg(long, help = "Skip the routing service and drive the direct path")]
    offline: bool,

    #[arg(long, help = "Routing service base URL")]
    osrm_url: Option<String>,

    #[arg(long, help = "Routing request timeout in seconds")]
    timeout_secs: Option<u64>,

    #[arg(long, help = "Seed incidents from a CSV file")]
    seed_csv: Option<PathBuf>,

    #[arg(long = "report", help = "File a user report before routing: kind@lat,lon (repeatable)")]
    reports: Vec<ReportSpec>,

    #[arg(long, help = "Simulation RNG seed")]
    seed: Option<u64>,

    #[arg(long, help = "Simulation ticks per second")]
    tick_hz: Option<u32>,

    #[arg(long, help = "Re-draw system incident severities on every feed refresh")]
    fluctuate: bool,

    #[arg(short, long, help = "Directory for CSV telemetry")]
    output: Option<PathBuf>,
}

impl Args {
    /// Load the config file (if any) and apply flags on top.
    fn into_config(self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if !self.waypoints.is_empty() {
            config.waypoints = self.waypoints;
        }
        config.avoid_severe |= self.avoid_severe;
        config.offline |= self.offline;
        config.fluctuate |= self.fluctuate;
        if let Some(url) = self.osrm_url {
            config.osrm.base_url = url;
        }
        if self.timeout_secs.is_some() {
            config.osrm.timeout_secs = self.timeout_secs;
        }
        if self.seed_csv.is_some() {
            config.seed_csv = self.seed_csv;
        }
        config.reports.extend(self.reports);
        if let Some(seed) = self.seed {
            config.sim.seed = seed;
        }
        if let Some(hz) = self.tick_hz {
            config.sim.tick_hz = hz;
        }
        if self.output.is_some() {
            config.output_dir = self.output;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = Args::parse().into_config()?;
    let summary = run(config).await?;
    info!(
        completed = summary.completed(),
        samples = summary.samples,
        distance_km = format_args!("{:.3}", summary.distance_km),
        "done"
    );
    Ok(())
}

/// Set up incidents, plan and evaluate the route, then drive it to the end
/// or until interrupted.
async fn run(config: AppConfig) -> Result<DriveSummary> {
    info!(mode = %config.mode, offline = config.offline, "starting drive");

    // ── Incidents ─────────────────────────────────────────────────────────
    let seed = match &config.seed_csv {
        Some(path) => load_seed_csv(path)
            .with_context(|| format!("loading seed incidents from {}", path.display()))?,
        None => default_seed(),
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(IncidentStore::with_seed(clock, seed));
    for report in &config.reports {
        store.report(report.location, report.kind, report.description.clone());
    }

    // ── Route ─────────────────────────────────────────────────────────────
    let transport: Arc<dyn RoutingTransport> = if config.offline {
        Arc::new(OfflineTransport)
    } else {
        Arc::new(OsrmTransport::new(config.osrm.clone())?)
    };
    let provider = RouteProvider::new(transport);
    let request = RouteRequest::from_points(config.route_points())
        .mode(config.mode)
        .avoid_severe(config.avoid_severe);

    let route = provider.get_route(&store, &request).await?;
    info!(
        points = route.coordinates.len(),
        distance_m = format_args!("{:.0}", route.distance_m),
        duration_s = format_args!("{:.0}", route.duration_s),
        alternatives = route.alternatives.len(),
        direct = route.is_direct_fallback(),
        "route ready"
    );

    let evaluation = RerouteEvaluator::with_radius(config.reroute_radius_m).evaluate(&store, route);
    match (&evaluation.outcome, evaluation.outcome.message()) {
        (RerouteOutcome::Rerouted { .. }, Some(msg)) => info!("{msg}"),
        (RerouteOutcome::NoClearRoute { .. }, Some(msg)) => warn!("{msg}"),
        _ => info!("route clear of severe incidents"),
    }

    // ── Feed + drive ──────────────────────────────────────────────────────
    let mut rng = SimRng::new(config.sim.seed);
    let feed = spawn_feed(
        Arc::clone(&store),
        Duration::from_secs(config.poll_secs),
        config.fluctuate,
        rng.child(1),
    );

    let mut sim = DriveSimulator::with_rng(config.sim.clone(), BandedSpeed, rng.child(2));
    sim.start(&evaluation.route)?;
    let progress = ProgressLog::new(config.progress_every_ticks());

    let summary = match &config.output_dir {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("opening telemetry in {}", dir.display()))?;
            let telemetry = TelemetryObserver::every(writer, config.output_every);
            let (summary, (_, mut telemetry)) = drive(spawn_drive(sim, (progress, telemetry))).await?;
            if let Some(e) = telemetry.take_error() {
                warn!(error = %e, "telemetry incomplete");
            } else {
                info!(dir = %dir.display(), "telemetry written");
            }
            summary
        }
        None => drive(spawn_drive(sim, progress)).await?.0,
    };

    feed.abort();
    Ok(summary)
}

/// Wait for the drive, stopping it on Ctrl-C.
async fn drive<O: DriveObserver + Send + 'static>(
    handle: DriveHandle<O>,
) -> Result<(DriveSummary, O)> {
    let stopper = handle.stopper();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            stopper.stop();
        }
    });
    let result = handle.join_with_observer().await;
    interrupt.abort();
    Ok(result?)
}
