// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Sweep Controller
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One event per sweep parameter, strictly sequential:
//! reset → load profile → generate and induce → report.

use std::io::Write;

use tracing::info;

use tct_lut::DepthDensityCache;
use tct_report::ReportWriter;
use tct_types::error::TctResult;

use crate::generator::CarrierGenerator;
use crate::oracle::TransportOracle;
use crate::signal::SignalAccumulator;
use crate::weighting::WeightingPotentialSeries;

pub struct SweepController<O: TransportOracle, W: Write> {
    cache: DepthDensityCache,
    generator: CarrierGenerator,
    accumulator: SignalAccumulator,
    series: WeightingPotentialSeries,
    oracle: O,
    writer: ReportWriter<W>,
}

impl<O: TransportOracle, W: Write> SweepController<O, W> {
    pub fn new(
        cache: DepthDensityCache,
        generator: CarrierGenerator,
        accumulator: SignalAccumulator,
        series: WeightingPotentialSeries,
        oracle: O,
        writer: ReportWriter<W>,
    ) -> Self {
        SweepController {
            cache,
            generator,
            accumulator,
            series,
            oracle,
            writer,
        }
    }

    /// Run the whole sweep. A LUT miss leaves that event running on
    /// whatever the cache holds (possibly nothing) and the sweep
    /// continues; transport and report failures abort the run.
    pub fn run(&mut self, sweep_um: &[f64], x_um: f64, y_um: f64, t0_ns: f64) -> TctResult<usize> {
        for (event, &hcenter_um) in sweep_um.iter().enumerate() {
            self.accumulator.reset();
            self.cache.load(hcenter_um);
            info!("event {event}: Hcenter = {hcenter_um} um");

            let generated =
                self.generator
                    .generate_for_column(self.cache.column(), x_um, y_um, t0_ns);
            for request in &generated.requests {
                self.oracle
                    .drift(request, &self.series, &mut self.accumulator)?;
            }

            self.writer.write_event(
                hcenter_um,
                x_um,
                y_um,
                generated.total_carriers,
                &self.accumulator.read_all(),
            )?;
        }
        Ok(sweep_um.len())
    }

    pub fn into_writer(self) -> ReportWriter<W> {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighting::WeightingSnapshot;
    use std::path::PathBuf;
    use tct_types::error::TctError;
    use tct_types::state::{CarrierRequest, DepthAxis, TimeWindow};

    /// Counts drifted carriers; induces a fixed amount into bin 0.
    struct CountingOracle {
        drifted: usize,
    }

    impl TransportOracle for CountingOracle {
        fn drift(
            &mut self,
            request: &CarrierRequest,
            _series: &WeightingPotentialSeries,
            signal: &mut SignalAccumulator,
        ) -> TctResult<()> {
            self.drifted += 1;
            signal.record(0, request.kind, 1.0)
        }
    }

    fn flat_series() -> WeightingPotentialSeries {
        let snapshot =
            |t: f64| WeightingSnapshot::new(t, vec![0.0, 500.0], vec![0.0, 1.0]).unwrap();
        WeightingPotentialSeries::from_snapshots(
            vec![0.0, 1.0],
            snapshot(0.0),
            vec![Some(snapshot(1.0))],
        )
        .unwrap()
    }

    fn write_temp_lut(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tct_sweep_{}_{name}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "z_um,100.0,200.0\n0.5,1.0,2.0\n1.5,1.0,0.0\n2.5,1.0,3.0\n",
        )
        .unwrap();
        path
    }

    fn make_controller(
        lut: PathBuf,
        n_bins: usize,
    ) -> SweepController<CountingOracle, Vec<u8>> {
        SweepController::new(
            DepthDensityCache::new(lut, "z_um", 1e-6),
            CarrierGenerator::new(DepthAxis::new(1.0), 500.0),
            SignalAccumulator::new(TimeWindow::new(0.005, n_bins)),
            flat_series(),
            CountingOracle { drifted: 0 },
            ReportWriter::new(Vec::new()),
        )
    }

    #[test]
    fn test_sweep_emits_one_block_per_parameter() {
        let lut = write_temp_lut("blocks");
        let mut controller = make_controller(lut, 10);
        let n = controller.run(&[100.0, 200.0], 5.0, 5.0, 0.0).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(controller.into_writer().into_inner()).unwrap();
        assert_eq!(text.matches("Hcenter = ").count(), 2);
        assert!(text.contains("Hcenter = 100 um"));
        assert!(text.contains("Hcenter = 200 um"));
        // Column [1,1,1] → 3 pairs; column [2,0,3] → 5 pairs.
        assert!(text.contains("TPA_carriers = 3"));
        assert!(text.contains("TPA_carriers = 5"));
    }

    #[test]
    fn test_accumulator_reset_between_events() {
        let lut = write_temp_lut("reset");
        let mut controller = make_controller(lut, 10);
        controller.run(&[100.0, 100.0], 0.0, 0.0, 0.0).unwrap();
        let text = String::from_utf8(controller.into_writer().into_inner()).unwrap();
        // Each event deposits 6 units into bin 0 (3 pairs, both species);
        // without the reset the second block would read 12.
        let bin0_lines: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with("0.0025"))
            .collect();
        assert_eq!(bin0_lines.len(), 2);
        for line in bin0_lines {
            assert!(line.starts_with("0.0025  6"), "unexpected line: {line}");
        }
    }

    #[test]
    fn test_lut_miss_runs_event_on_stale_data() {
        let lut = write_temp_lut("stale");
        let mut controller = make_controller(lut, 10);
        controller.run(&[100.0, 999.0], 0.0, 0.0, 0.0).unwrap();
        assert_eq!(controller.oracle.drifted, 12);
        let text = String::from_utf8(controller.into_writer().into_inner()).unwrap();
        // The missing parameter still reports, on the stale column.
        assert!(text.contains("Hcenter = 999 um"));
        assert_eq!(text.matches("TPA_carriers = 3").count(), 2);
    }

    #[test]
    fn test_empty_cache_reports_zero_carriers() {
        let missing = std::env::temp_dir().join("tct_sweep_missing_lut.csv");
        let mut controller = make_controller(missing, 10);
        controller.run(&[100.0], 0.0, 0.0, 0.0).unwrap();
        assert_eq!(controller.oracle.drifted, 0);
        let text = String::from_utf8(controller.into_writer().into_inner()).unwrap();
        assert!(text.contains("TPA_carriers = 0"));
    }

    /// Oracle that always reports a transport failure.
    struct FailingOracle;

    impl TransportOracle for FailingOracle {
        fn drift(
            &mut self,
            _request: &CarrierRequest,
            _series: &WeightingPotentialSeries,
            _signal: &mut SignalAccumulator,
        ) -> TctResult<()> {
            Err(TctError::Transport("broken".to_string()))
        }
    }

    #[test]
    fn test_transport_failure_aborts_the_run() {
        let lut = write_temp_lut("abort");
        let mut controller = SweepController::new(
            DepthDensityCache::new(lut, "z_um", 1e-6),
            CarrierGenerator::new(DepthAxis::new(1.0), 500.0),
            SignalAccumulator::new(TimeWindow::new(0.005, 10)),
            flat_series(),
            FailingOracle,
            ReportWriter::new(Vec::new()),
        );
        assert!(controller.run(&[100.0], 0.0, 0.0, 0.0).is_err());
    }
}
