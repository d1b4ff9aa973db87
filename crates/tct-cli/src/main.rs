//! # TCT Signal Core: TPA-TCT depth-scan signal simulation
//!
//! Simulates the transient signal of a segmented detector for a sweep of
//! beam-center depths (Hcenter), one report block per sweep value.
//!
//! ## Usage
//! ```bash
//! tct-signal <x0_um> <y0_um> <time_step_ns>
//! ```
//!
//! `x0`/`y0` are the probe position in micrometers, `time_step_ns` the
//! spacing of the dynamic weighting-potential snapshots. Reads
//! `detector_config.json` from the working directory when present.

use std::path::Path;

use tracing::info;

use tct_core::generator::CarrierGenerator;
use tct_core::oracle::LinearDriftOracle;
use tct_core::signal::SignalAccumulator;
use tct_core::sweep::SweepController;
use tct_core::weighting::{
    SnapshotSources, TabulatedSnapshotLoader, TimeGrid, WeightingPotentialSeries,
};
use tct_lut::DepthDensityCache;
use tct_report::{report_file_name, ReportWriter};
use tct_types::config::DetectorConfig;
use tct_types::error::{TctError, TctResult};
use tct_types::state::{DepthAxis, TimeWindow};

const CONFIG_FILE: &str = "detector_config.json";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt().with_target(false).init();
}

/// The three positional parameters: probe x (µm), probe y (µm), snapshot
/// time step (ns).
fn parse_args() -> TctResult<(f64, f64, f64)> {
    let args: Vec<String> = std::env::args().collect();
    let usage = || {
        TctError::Usage(format!(
            "usage: {} <x0_um> <y0_um> <time_step_ns>\n  \
             x0, y0: beam position in micrometers\n  \
             time_step_ns: snapshot time interval in nanoseconds",
            args.first().map(String::as_str).unwrap_or("tct-signal")
        ))
    };
    if args.len() < 4 {
        return Err(usage());
    }
    let parse = |cell: &str| cell.parse::<f64>().map_err(|_| usage());
    Ok((parse(&args[1])?, parse(&args[2])?, parse(&args[3])?))
}

fn run() -> TctResult<()> {
    init_logging();
    let (x0_um, y0_um, dt_ns) = parse_args()?;

    let config = if Path::new(CONFIG_FILE).exists() {
        DetectorConfig::from_file(CONFIG_FILE)?
    } else {
        DetectorConfig::default()
    };
    config.validate()?;

    let time_grid = TimeGrid::uniform(config.weighting.n_time_steps, dt_ns)?;
    let sources = SnapshotSources::from_weighting(&config.weighting);
    info!(
        "loading weighting-potential series for electrode {:?} ({} time steps)",
        config.weighting.electrode_label,
        time_grid.n_steps()
    );
    let series =
        WeightingPotentialSeries::initialize(&TabulatedSnapshotLoader, &sources, &time_grid)?;

    let sweep = config.sweep.values();
    let window = TimeWindow::new(config.signal.t_step_ns, config.signal.n_bins);
    info!(
        "running simulation for {} Hcenter values from {} um to {} um",
        sweep.len(),
        config.sweep.start_um,
        config.sweep.stop_um
    );
    info!("beam position: x0 = {x0_um} um, y0 = {y0_um} um");
    info!(
        "snapshot window: 0 to {} ns (step: {dt_ns} ns), signal window: {} bins of {} ns",
        time_grid.time_at(time_grid.n_steps() - 1),
        window.n_bins,
        window.t_step_ns
    );

    let report_path = report_file_name(x0_um, y0_um);
    let mut controller = SweepController::new(
        DepthDensityCache::new(
            config.lut.path.as_path(),
            config.lut.depth_marker.as_str(),
            config.lut.match_tolerance_um,
        ),
        CarrierGenerator::new(
            DepthAxis::new(config.geometry.lut_bin_width_um),
            config.geometry.sensor_thickness_um,
        ),
        SignalAccumulator::new(window),
        series,
        LinearDriftOracle::new(config.geometry.sensor_thickness_um),
        ReportWriter::create(&report_path)?,
    );

    let n_events = controller.run(&sweep, x0_um, y0_um, 0.0)?;
    info!("done: {n_events} events written to {report_path}");
    Ok(())
}
