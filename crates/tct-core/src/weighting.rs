// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Weighting-Potential Series
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Time-indexed series of weighting-potential snapshots.
//!
//! One prompt snapshot at t = 0 plus one dynamic snapshot per later time
//! step. The series is built once at program start and is immutable and
//! shared for the whole sweep. It only holds and indexes the snapshots;
//! evaluating the potential along a trajectory belongs to the transport
//! oracle.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::Array1;
use tracing::{info, warn};

use tct_types::config::WeightingParams;
use tct_types::error::{TctError, TctResult};

/// Relative tolerance for the constant-spacing check of the time axis.
const SPACING_TOLERANCE: f64 = 1e-9;

/// Discretized time axis of the series: n_steps values i * dt_ns, the
/// first (t = 0) being the prompt step.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    times_ns: Vec<f64>,
}

impl TimeGrid {
    pub fn uniform(n_steps: usize, dt_ns: f64) -> TctResult<Self> {
        if n_steps < 2 {
            return Err(TctError::Snapshot(
                "time grid needs the prompt step and at least one dynamic step".to_string(),
            ));
        }
        if !dt_ns.is_finite() || dt_ns <= 0.0 {
            return Err(TctError::Snapshot(format!(
                "time step must be finite and > 0, got {dt_ns}"
            )));
        }
        Ok(TimeGrid {
            times_ns: (0..n_steps).map(|i| i as f64 * dt_ns).collect(),
        })
    }

    pub fn n_steps(&self) -> usize {
        self.times_ns.len()
    }

    pub fn dt_ns(&self) -> f64 {
        self.times_ns[1] - self.times_ns[0]
    }

    pub fn time_at(&self, index: usize) -> f64 {
        self.times_ns[index]
    }

    pub fn times_ns(&self) -> &[f64] {
        &self.times_ns
    }
}

/// Depth-sampled weighting potential at one time step, already referenced
/// to the ground file and scaled.
#[derive(Debug, Clone)]
pub struct WeightingSnapshot {
    pub time_ns: f64,
    z_um: Array1<f64>,
    w: Array1<f64>,
}

impl WeightingSnapshot {
    pub fn new(time_ns: f64, z_um: Vec<f64>, w: Vec<f64>) -> TctResult<Self> {
        if z_um.len() != w.len() {
            return Err(TctError::Snapshot(format!(
                "snapshot sampling mismatch: {} depth nodes, {} potential values",
                z_um.len(),
                w.len()
            )));
        }
        if z_um.len() < 2 {
            return Err(TctError::Snapshot(
                "snapshot needs at least two depth nodes".to_string(),
            ));
        }
        if z_um.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(TctError::Snapshot(
                "snapshot depth nodes must be strictly increasing".to_string(),
            ));
        }
        if z_um.iter().chain(w.iter()).any(|v| !v.is_finite()) {
            return Err(TctError::Snapshot(
                "snapshot contains non-finite values".to_string(),
            ));
        }
        Ok(WeightingSnapshot {
            time_ns,
            z_um: Array1::from(z_um),
            w: Array1::from(w),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.z_um.len()
    }

    /// Clamped linear evaluation of the potential at depth `z_um`.
    pub fn evaluate(&self, z_um: f64) -> f64 {
        let n = self.z_um.len();
        if z_um <= self.z_um[0] {
            return self.w[0];
        }
        if z_um >= self.z_um[n - 1] {
            return self.w[n - 1];
        }
        // Binary search for the segment bracketing z.
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.z_um[mid] <= z_um {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let t = (z_um - self.z_um[lo]) / (self.z_um[hi] - self.z_um[lo]);
        (1.0 - t) * self.w[lo] + t * self.w[hi]
    }
}

/// Loads one snapshot from its time-indexed source, subtracting the ground
/// reference and scaling. The mesh/field ingestion behind this seam is
/// external to the engine.
pub trait SnapshotLoader {
    fn load(
        &self,
        ground: &Path,
        snapshot: &Path,
        scale: f64,
        time_ns: f64,
    ) -> TctResult<WeightingSnapshot>;
}

/// Two-column whitespace-separated text profiles: depth (µm), potential.
pub struct TabulatedSnapshotLoader;

fn read_profile(path: &Path) -> TctResult<(Vec<f64>, Vec<f64>)> {
    let file = File::open(path)
        .map_err(|err| TctError::Snapshot(format!("cannot open {}: {err}", path.display())))?;
    let mut z = Vec::new();
    let mut w = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let (Some(z_cell), Some(w_cell)) = (fields.next(), fields.next()) else {
            return Err(TctError::Snapshot(format!(
                "{}:{}: expected two columns",
                path.display(),
                line_no + 1
            )));
        };
        let parse = |cell: &str| {
            cell.parse::<f64>().map_err(|_| {
                TctError::Snapshot(format!(
                    "{}:{}: unparsable value {cell:?}",
                    path.display(),
                    line_no + 1
                ))
            })
        };
        z.push(parse(z_cell)?);
        w.push(parse(w_cell)?);
    }
    Ok((z, w))
}

impl SnapshotLoader for TabulatedSnapshotLoader {
    fn load(
        &self,
        ground: &Path,
        snapshot: &Path,
        scale: f64,
        time_ns: f64,
    ) -> TctResult<WeightingSnapshot> {
        let (ground_z, ground_w) = read_profile(ground)?;
        let (z, raw) = read_profile(snapshot)?;
        if z.len() != ground_z.len()
            || z.iter()
                .zip(&ground_z)
                .any(|(a, b)| (a - b).abs() > SPACING_TOLERANCE)
        {
            return Err(TctError::Snapshot(format!(
                "{} is not sampled on the ground-reference depth nodes",
                snapshot.display()
            )));
        }
        let referenced = raw
            .iter()
            .zip(&ground_w)
            .map(|(v, g)| (v - g) * scale)
            .collect();
        WeightingSnapshot::new(time_ns, z, referenced)
    }
}

/// File set the series is built from: the ground reference, the prompt
/// snapshot (t = 0) and one dynamic snapshot per later time step, named by
/// the zero-padded 6-digit step index.
#[derive(Debug, Clone)]
pub struct SnapshotSources {
    pub ground: PathBuf,
    pub prompt: PathBuf,
    pub dynamic: Vec<PathBuf>,
    pub scale: f64,
}

impl SnapshotSources {
    pub fn from_weighting(params: &WeightingParams) -> Self {
        SnapshotSources {
            ground: params.ground_file.clone(),
            prompt: params.snapshot_path(0),
            dynamic: (1..params.n_time_steps)
                .map(|index| params.snapshot_path(index))
                .collect(),
            scale: params.scale,
        }
    }
}

/// The series itself. The prompt snapshot is mandatory; dynamic steps may
/// carry a gap where their snapshot failed to load.
#[derive(Debug)]
pub struct WeightingPotentialSeries {
    times_ns: Vec<f64>,
    prompt: WeightingSnapshot,
    dynamic: Vec<Option<WeightingSnapshot>>,
}

impl WeightingPotentialSeries {
    /// Load the whole series. The prompt snapshot must load or the
    /// initialization fails; a dynamic snapshot that fails to load leaves
    /// a gap at its time step and a warning, and loading continues.
    pub fn initialize(
        loader: &dyn SnapshotLoader,
        sources: &SnapshotSources,
        grid: &TimeGrid,
    ) -> TctResult<Self> {
        if sources.dynamic.len() != grid.n_steps() - 1 {
            return Err(TctError::Snapshot(format!(
                "{} dynamic sources for {} dynamic time steps",
                sources.dynamic.len(),
                grid.n_steps() - 1
            )));
        }

        let prompt = loader
            .load(&sources.ground, &sources.prompt, sources.scale, 0.0)
            .map_err(|err| TctError::PromptSnapshot(err.to_string()))?;
        info!(
            "prompt weighting snapshot loaded from {}",
            sources.prompt.display()
        );

        let mut dynamic = Vec::with_capacity(sources.dynamic.len());
        for (step, path) in sources.dynamic.iter().enumerate() {
            let time_ns = grid.time_at(step + 1);
            match loader.load(&sources.ground, path, sources.scale, time_ns) {
                Ok(snapshot) => dynamic.push(Some(snapshot)),
                Err(err) => {
                    warn!("failed to load dynamic weighting snapshot for t = {time_ns} ns: {err}");
                    dynamic.push(None);
                }
            }
        }
        let loaded = dynamic.iter().filter(|slot| slot.is_some()).count();
        info!("{loaded}/{} dynamic weighting snapshots loaded", dynamic.len());

        Self::from_snapshots(grid.times_ns().to_vec(), prompt, dynamic)
    }

    /// Assemble a series from already-built snapshots. `dynamic[k]` belongs
    /// to time step k + 1; a `None` is an accepted gap.
    pub fn from_snapshots(
        times_ns: Vec<f64>,
        prompt: WeightingSnapshot,
        dynamic: Vec<Option<WeightingSnapshot>>,
    ) -> TctResult<Self> {
        if times_ns.len() < 2 || times_ns[0] != 0.0 {
            return Err(TctError::Snapshot(
                "time axis must start at 0 and hold at least two steps".to_string(),
            ));
        }
        if dynamic.len() != times_ns.len() - 1 {
            return Err(TctError::Snapshot(format!(
                "{} dynamic snapshots for {} dynamic time steps",
                dynamic.len(),
                times_ns.len() - 1
            )));
        }
        let dt = times_ns[1] - times_ns[0];
        if dt <= 0.0
            || times_ns
                .windows(2)
                .any(|pair| (pair[1] - pair[0] - dt).abs() > SPACING_TOLERANCE * dt.max(1.0))
        {
            return Err(TctError::Snapshot(
                "time axis spacing must be constant and > 0".to_string(),
            ));
        }
        Ok(WeightingPotentialSeries {
            times_ns,
            prompt,
            dynamic,
        })
    }

    pub fn n_steps(&self) -> usize {
        self.times_ns.len()
    }

    pub fn dt_ns(&self) -> f64 {
        self.times_ns[1] - self.times_ns[0]
    }

    pub fn time_at(&self, index: usize) -> f64 {
        self.times_ns[index]
    }

    pub fn prompt(&self) -> &WeightingSnapshot {
        &self.prompt
    }

    /// Snapshot at time step `index`; None for a gap or past the series.
    pub fn snapshot_at(&self, index: usize) -> Option<&WeightingSnapshot> {
        if index == 0 {
            Some(&self.prompt)
        } else {
            self.dynamic.get(index - 1).and_then(|slot| slot.as_ref())
        }
    }

    /// Time-step indices bracketing `t_ns`, clamped to the series range.
    pub fn bracket(&self, t_ns: f64) -> (usize, usize) {
        let last = self.n_steps() - 1;
        if !t_ns.is_finite() || t_ns <= 0.0 {
            return (0, 0);
        }
        let lo = ((t_ns / self.dt_ns()).floor() as usize).min(last);
        (lo, (lo + 1).min(last))
    }

    /// Latest loaded snapshot at or before step `index`. Falls back to the
    /// prompt snapshot, which always exists.
    pub fn loaded_at_or_before(&self, index: usize) -> (usize, &WeightingSnapshot) {
        let mut step = index.min(self.n_steps() - 1);
        while step > 0 {
            if let Some(snapshot) = self.snapshot_at(step) {
                return (step, snapshot);
            }
            step -= 1;
        }
        (0, &self.prompt)
    }

    /// Earliest loaded snapshot at or after step `index`, None when the
    /// gap extends to the end of the series.
    pub fn loaded_at_or_after(&self, index: usize) -> Option<(usize, &WeightingSnapshot)> {
        (index.min(self.n_steps() - 1)..self.n_steps())
            .find_map(|step| self.snapshot_at(step).map(|snapshot| (step, snapshot)))
    }
}
