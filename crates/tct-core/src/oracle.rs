// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Transport Oracle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The seam to the carrier-transport physics.
//!
//! The engine hands every generated carrier to a [`TransportOracle`],
//! which walks the trajectory and deposits induced-current contributions
//! into the accumulator, consulting the weighting-potential series.
//! [`LinearDriftOracle`] is the built-in reference implementation:
//! constant drift velocity, fixed distance steps, Ramo induction from the
//! bracketing snapshots.

use rand_distr::{Distribution, Normal};

use tct_types::constants::ELEMENTARY_CHARGE_FC;
use tct_types::error::{TctError, TctResult};
use tct_types::state::{CarrierRequest, CarrierType};

use crate::signal::SignalAccumulator;
use crate::weighting::WeightingPotentialSeries;

pub trait TransportOracle {
    /// Drift one carrier and deposit its induced-current contributions.
    fn drift(
        &mut self,
        request: &CarrierRequest,
        series: &WeightingPotentialSeries,
        signal: &mut SignalAccumulator,
    ) -> TctResult<()>;
}

/// Weighting potential at depth `z_um` and time `t_ns`, interpolated
/// linearly in time between the nearest loaded snapshots. Gaps in the
/// series are skipped; past the last loaded snapshot the latest one holds.
pub fn weighting_at(series: &WeightingPotentialSeries, z_um: f64, t_ns: f64) -> f64 {
    let (lo, hi) = series.bracket(t_ns);
    let (step_lo, snap_lo) = series.loaded_at_or_before(lo);
    let Some((step_hi, snap_hi)) = series.loaded_at_or_after(hi) else {
        return snap_lo.evaluate(z_um);
    };
    if step_hi == step_lo {
        return snap_lo.evaluate(z_um);
    }
    let t_lo = series.time_at(step_lo);
    let t_hi = series.time_at(step_hi);
    let frac = ((t_ns - t_lo) / (t_hi - t_lo)).clamp(0.0, 1.0);
    (1.0 - frac) * snap_lo.evaluate(z_um) + frac * snap_hi.evaluate(z_um)
}

/// Electron saturation drift velocity in CVD diamond (µm/ns), toward the
/// back face.
const ELECTRON_VELOCITY_UM_NS: f64 = 96.0;

/// Hole saturation drift velocity (µm/ns), toward the illuminated face.
const HOLE_VELOCITY_UM_NS: f64 = -141.0;

/// Trajectory step length (µm).
const DISTANCE_STEP_UM: f64 = 1.0;

/// Constant-velocity drift with Ramo induced-charge deposition.
pub struct LinearDriftOracle {
    /// Signed drift velocity per species (µm/ns).
    pub electron_velocity_um_ns: f64,
    pub hole_velocity_um_ns: f64,
    /// Distance covered per trajectory step (µm).
    pub distance_step_um: f64,
    pub sensor_thickness_um: f64,
    /// Gaussian smearing of the carrier start time (ns); 0 disables.
    pub diffusion_sigma_ns: f64,
}

impl LinearDriftOracle {
    pub fn new(sensor_thickness_um: f64) -> Self {
        LinearDriftOracle {
            electron_velocity_um_ns: ELECTRON_VELOCITY_UM_NS,
            hole_velocity_um_ns: HOLE_VELOCITY_UM_NS,
            distance_step_um: DISTANCE_STEP_UM,
            sensor_thickness_um,
            diffusion_sigma_ns: 0.0,
        }
    }

    fn velocity_for(&self, kind: CarrierType) -> f64 {
        match kind {
            CarrierType::Electron => self.electron_velocity_um_ns,
            CarrierType::Hole => self.hole_velocity_um_ns,
        }
    }
}

impl TransportOracle for LinearDriftOracle {
    fn drift(
        &mut self,
        request: &CarrierRequest,
        series: &WeightingPotentialSeries,
        signal: &mut SignalAccumulator,
    ) -> TctResult<()> {
        let velocity = self.velocity_for(request.kind);
        if !velocity.is_finite() || velocity == 0.0 {
            return Err(TctError::Transport(format!(
                "drift velocity for {:?} must be finite and non-zero",
                request.kind
            )));
        }
        if self.distance_step_um <= 0.0 {
            return Err(TctError::Transport(
                "distance step must be > 0".to_string(),
            ));
        }

        let q_fc = request.kind.charge_sign() * ELEMENTARY_CHARGE_FC;
        let window = signal.window();
        let dt_ns = self.distance_step_um / velocity.abs();

        let mut t_ns = request.t0_ns;
        if self.diffusion_sigma_ns > 0.0 {
            let spread = Normal::new(0.0, self.diffusion_sigma_ns)
                .map_err(|err| TctError::Transport(err.to_string()))?;
            t_ns = (t_ns + spread.sample(&mut rand::thread_rng())).max(0.0);
        }

        let mut z_um = request.position.z_um;
        if z_um < 0.0 || z_um > self.sensor_thickness_um {
            return Ok(());
        }
        let mut w_prev = weighting_at(series, z_um, t_ns);

        loop {
            let mut step_dt = dt_ns;
            let mut z_next = z_um + velocity * dt_ns;
            let mut collected = false;
            if z_next <= 0.0 {
                step_dt = dt_ns * (z_um / (z_um - z_next)).clamp(0.0, 1.0);
                z_next = 0.0;
                collected = true;
            } else if z_next >= self.sensor_thickness_um {
                let remaining = self.sensor_thickness_um - z_um;
                step_dt = dt_ns * (remaining / (z_next - z_um)).clamp(0.0, 1.0);
                z_next = self.sensor_thickness_um;
                collected = true;
            }
            let t_next = t_ns + step_dt;
            let w_next = weighting_at(series, z_next, t_next);
            let induced_fc = q_fc * (w_next - w_prev);
            if let Some(bin) = window.bin_index(t_ns) {
                signal.record(bin, request.kind, induced_fc / window.t_step_ns)?;
            }
            z_um = z_next;
            t_ns = t_next;
            w_prev = w_next;
            if collected || t_ns >= window.span_ns() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighting::WeightingSnapshot;
    use tct_types::state::{Position3, TimeWindow};

    const THICKNESS: f64 = 500.0;

    fn linear_snapshot(time_ns: f64) -> WeightingSnapshot {
        WeightingSnapshot::new(time_ns, vec![0.0, THICKNESS], vec![0.0, 1.0]).unwrap()
    }

    /// Static series: the same linear profile at every time step.
    fn static_series() -> WeightingPotentialSeries {
        WeightingPotentialSeries::from_snapshots(
            vec![0.0, 1.0, 2.0],
            linear_snapshot(0.0),
            vec![Some(linear_snapshot(1.0)), Some(linear_snapshot(2.0))],
        )
        .unwrap()
    }

    fn request(kind: CarrierType, z_um: f64) -> CarrierRequest {
        CarrierRequest {
            kind,
            position: Position3 {
                x_um: 0.0,
                y_um: 0.0,
                z_um,
            },
            t0_ns: 0.0,
        }
    }

    fn collected_charge_fc(signal: &SignalAccumulator) -> f64 {
        signal
            .read_all()
            .iter()
            .map(|s| s.total * signal.window().t_step_ns)
            .sum()
    }

    #[test]
    fn test_weighting_at_interpolates_in_time() {
        let ramp_up = WeightingSnapshot::new(1.0, vec![0.0, THICKNESS], vec![0.0, 2.0]).unwrap();
        let series = WeightingPotentialSeries::from_snapshots(
            vec![0.0, 1.0],
            linear_snapshot(0.0),
            vec![Some(ramp_up)],
        )
        .unwrap();
        // At the back face: 1.0 at t=0, 2.0 at t=1.
        assert!((weighting_at(&series, THICKNESS, 0.0) - 1.0).abs() < 1e-12);
        assert!((weighting_at(&series, THICKNESS, 0.5) - 1.5).abs() < 1e-12);
        assert!((weighting_at(&series, THICKNESS, 1.0) - 2.0).abs() < 1e-12);
        // Past the series the last snapshot holds.
        assert!((weighting_at(&series, THICKNESS, 9.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighting_at_skips_gaps() {
        let late = WeightingSnapshot::new(2.0, vec![0.0, THICKNESS], vec![0.0, 3.0]).unwrap();
        let series = WeightingPotentialSeries::from_snapshots(
            vec![0.0, 1.0, 2.0],
            linear_snapshot(0.0),
            vec![None, Some(late)],
        )
        .unwrap();
        // t=1 falls in the gap: interpolate between steps 0 and 2.
        assert!((weighting_at(&series, THICKNESS, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_electron_collects_expected_charge() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 2000));
        oracle
            .drift(&request(CarrierType::Electron, 250.0), &series, &mut signal)
            .unwrap();
        // Electron drifts from w = 0.5 to the back face (w = 1):
        // induced charge q * Δw = -e * 0.5.
        let expected = -0.5 * ELEMENTARY_CHARGE_FC;
        assert!((collected_charge_fc(&signal) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_hole_collects_expected_charge() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 2000));
        oracle
            .drift(&request(CarrierType::Hole, 250.0), &series, &mut signal)
            .unwrap();
        // Hole drifts from w = 0.5 to the front face (w = 0):
        // induced charge q * Δw = +e * (0 - 0.5).
        let expected = -0.5 * ELEMENTARY_CHARGE_FC;
        assert!((collected_charge_fc(&signal) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pair_from_same_depth_induces_full_elementary_charge() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 2000));
        for kind in [CarrierType::Electron, CarrierType::Hole] {
            oracle.drift(&request(kind, 100.0), &series, &mut signal).unwrap();
        }
        let expected = -ELEMENTARY_CHARGE_FC;
        assert!((collected_charge_fc(&signal) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_electron_and_hole_channels_are_separate() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 2000));
        oracle
            .drift(&request(CarrierType::Electron, 250.0), &series, &mut signal)
            .unwrap();
        let samples = signal.read_all();
        assert!(samples.iter().all(|s| s.hole == 0.0));
        assert!(samples.iter().any(|s| s.electron != 0.0));
    }

    #[test]
    fn test_zero_velocity_is_a_transport_error() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        oracle.hole_velocity_um_ns = 0.0;
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 100));
        let err = oracle
            .drift(&request(CarrierType::Hole, 250.0), &series, &mut signal)
            .unwrap_err();
        assert!(matches!(err, TctError::Transport(_)));
    }

    #[test]
    fn test_carrier_outside_sensor_is_ignored() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 100));
        oracle
            .drift(&request(CarrierType::Electron, 600.0), &series, &mut signal)
            .unwrap();
        assert!((collected_charge_fc(&signal)).abs() < 1e-15);
    }

    #[test]
    fn test_diffusion_smearing_still_collects_charge() {
        let series = static_series();
        let mut oracle = LinearDriftOracle::new(THICKNESS);
        oracle.diffusion_sigma_ns = 0.05;
        let mut signal = SignalAccumulator::new(TimeWindow::new(0.005, 2000));
        oracle
            .drift(&request(CarrierType::Electron, 250.0), &series, &mut signal)
            .unwrap();
        let expected = -0.5 * ELEMENTARY_CHARGE_FC;
        assert!((collected_charge_fc(&signal) - expected).abs() < 1e-9);
    }
}
