// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Signal Accumulator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Time-binned induced-current histogram for one event.
//!
//! Holds exactly one event's state: reset at event start, mutated
//! additively while carriers drift, read out once the event completes.

use ndarray::Array1;

use tct_types::error::{TctError, TctResult};
use tct_types::state::{CarrierType, SignalSample, TimeWindow};

pub struct SignalAccumulator {
    window: TimeWindow,
    total: Array1<f64>,
    electron: Array1<f64>,
    hole: Array1<f64>,
}

impl SignalAccumulator {
    pub fn new(window: TimeWindow) -> Self {
        SignalAccumulator {
            window,
            total: Array1::zeros(window.n_bins),
            electron: Array1::zeros(window.n_bins),
            hole: Array1::zeros(window.n_bins),
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn n_bins(&self) -> usize {
        self.window.n_bins
    }

    /// Zero every channel. Called exactly once per event, before any
    /// carrier is processed.
    pub fn reset(&mut self) {
        self.total.fill(0.0);
        self.electron.fill(0.0);
        self.hole.fill(0.0);
    }

    /// Add `amount` to the total channel and to the per-type channel of
    /// `kind` at `bin`. An out-of-range bin is a programming error given a
    /// validated time window, and fails hard.
    pub fn record(&mut self, bin: usize, kind: CarrierType, amount: f64) -> TctResult<()> {
        if bin >= self.window.n_bins {
            return Err(TctError::SignalBinOutOfRange {
                bin,
                n_bins: self.window.n_bins,
            });
        }
        self.total[bin] += amount;
        match kind {
            CarrierType::Electron => self.electron[bin] += amount,
            CarrierType::Hole => self.hole[bin] += amount,
        }
        Ok(())
    }

    pub fn sample(&self, bin: usize) -> Option<SignalSample> {
        if bin >= self.window.n_bins {
            return None;
        }
        Some(SignalSample {
            time_ns: self.window.bin_center_ns(bin),
            total: self.total[bin],
            electron: self.electron[bin],
            hole: self.hole[bin],
        })
    }

    /// The full histogram for reporting. Only meaningful once all carriers
    /// of the event have been processed.
    pub fn read_all(&self) -> Vec<SignalSample> {
        (0..self.window.n_bins)
            .map(|bin| SignalSample {
                time_ns: self.window.bin_center_ns(bin),
                total: self.total[bin],
                electron: self.electron[bin],
                hole: self.hole[bin],
            })
            .collect()
    }
}
