// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;
use crate::error::{TctError, TctResult};

/// Top-level simulation configuration.
/// Maps 1:1 to detector_config.json at the repository root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub detector_name: String,
    pub geometry: GeometryParams,
    pub signal: SignalParams,
    pub weighting: WeightingParams,
    pub lut: LutParams,
    pub sweep: SweepParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Sensor thickness (µm). Carriers outside [0, thickness] are skipped.
    pub sensor_thickness_um: f64,
    /// Depth bin width of the LUT column (µm).
    #[serde(default = "default_lut_bin_width")]
    pub lut_bin_width_um: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalParams {
    pub n_bins: usize,
    pub t_step_ns: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightingParams {
    /// Time steps of the weighting-potential series, prompt step included.
    pub n_time_steps: usize,
    /// Reference ("ground") potential file subtracted from every snapshot.
    pub ground_file: PathBuf,
    /// Directory holding the time-indexed snapshot files.
    pub snapshot_dir: PathBuf,
    /// File-name prefix of the snapshot files.
    pub snapshot_prefix: String,
    /// Scale applied to the referenced potential (default 1.0).
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Readout electrode the series belongs to.
    pub electrode_label: String,
}

impl WeightingParams {
    /// Snapshot path for time step `index`:
    /// {snapshot_dir}/{snapshot_prefix}_{index:06}_des.dat
    pub fn snapshot_path(&self, index: usize) -> PathBuf {
        self.snapshot_dir
            .join(format!("{}_{:06}_des.dat", self.snapshot_prefix, index))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LutParams {
    pub path: PathBuf,
    /// First token of the LUT header row (depth-axis column marker).
    #[serde(default = "default_depth_marker")]
    pub depth_marker: String,
    #[serde(default = "default_match_tolerance")]
    pub match_tolerance_um: f64,
}

/// Ordered Hcenter sweep: start, start + step, ..., stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepParams {
    pub start_um: f64,
    pub stop_um: f64,
    pub step_um: f64,
}

impl SweepParams {
    pub fn values(&self) -> Vec<f64> {
        if self.step_um <= 0.0 || self.stop_um < self.start_um {
            return Vec::new();
        }
        let n = ((self.stop_um - self.start_um) / self.step_um).round() as usize;
        (0..=n)
            .map(|i| self.start_um + i as f64 * self.step_um)
            .collect()
    }
}

fn default_lut_bin_width() -> f64 {
    constants::LUT_BIN_WIDTH_UM
}
fn default_scale() -> f64 {
    1.0
}
fn default_depth_marker() -> String {
    "z_um".to_string()
}
fn default_match_tolerance() -> f64 {
    constants::HCENTER_TOLERANCE_UM
}

impl DetectorConfig {
    /// Load from JSON file.
    pub fn from_file(path: &str) -> TctResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Time values of the weighting-potential series: i * dt_ns, the first
    /// being the prompt step at t = 0.
    pub fn time_steps_ns(&self, dt_ns: f64) -> Vec<f64> {
        (0..self.weighting.n_time_steps)
            .map(|i| i as f64 * dt_ns)
            .collect()
    }

    pub fn validate(&self) -> TctResult<()> {
        if self.geometry.sensor_thickness_um <= 0.0 {
            return Err(TctError::ConfigError(
                "geometry.sensor_thickness_um must be > 0".to_string(),
            ));
        }
        if self.geometry.lut_bin_width_um <= 0.0 {
            return Err(TctError::ConfigError(
                "geometry.lut_bin_width_um must be > 0".to_string(),
            ));
        }
        if self.signal.n_bins == 0 || self.signal.t_step_ns <= 0.0 {
            return Err(TctError::ConfigError(
                "signal window must have n_bins > 0 and t_step_ns > 0".to_string(),
            ));
        }
        if self.weighting.n_time_steps < 2 {
            return Err(TctError::ConfigError(
                "weighting.n_time_steps must include the prompt step and at least one dynamic step"
                    .to_string(),
            ));
        }
        if self.lut.match_tolerance_um <= 0.0 {
            return Err(TctError::ConfigError(
                "lut.match_tolerance_um must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    /// Reference configuration: 500 µm sensor, 21 time steps, 2000 signal
    /// bins of 0.005 ns, sweep -50..550 µm.
    fn default() -> Self {
        DetectorConfig {
            detector_name: "Diamond-4pad".to_string(),
            geometry: GeometryParams {
                sensor_thickness_um: constants::SENSOR_THICKNESS_UM,
                lut_bin_width_um: constants::LUT_BIN_WIDTH_UM,
            },
            signal: SignalParams {
                n_bins: constants::N_SIGNAL_BINS,
                t_step_ns: constants::SIGNAL_BIN_WIDTH_NS,
            },
            weighting: WeightingParams {
                n_time_steps: constants::N_TIME_STEPS,
                ground_file: PathBuf::from("fields/gnd.dat"),
                snapshot_dir: PathBuf::from("fields/1e-3"),
                snapshot_prefix: "1e-3".to_string(),
                scale: 1.0,
                electrode_label: "sign".to_string(),
            },
            lut: LutParams {
                path: PathBuf::from("LUT.csv"),
                depth_marker: "z_um".to_string(),
                match_tolerance_um: constants::HCENTER_TOLERANCE_UM,
            },
            sweep: SweepParams {
                start_um: -50.0,
                stop_um: 550.0,
                step_um: 1.0,
            },
        }
    }
}
