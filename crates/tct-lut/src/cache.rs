// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Depth-Density Cache
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Single-column cache over the carrier-generation LUT.
//!
//! Holds at most one depth-density column, keyed by the Hcenter it was
//! loaded for. Load failures are degraded modes, not errors: the cache
//! keeps its prior state and the sweep continues on whatever is cached.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::table::LutTable;

pub struct DepthDensityCache {
    source: PathBuf,
    depth_marker: String,
    tolerance_um: f64,
    cached_hcenter_um: Option<f64>,
    column: Vec<f64>,
}

impl DepthDensityCache {
    pub fn new(
        source: impl Into<PathBuf>,
        depth_marker: impl Into<String>,
        tolerance_um: f64,
    ) -> Self {
        DepthDensityCache {
            source: source.into(),
            depth_marker: depth_marker.into(),
            tolerance_um,
            cached_hcenter_um: None,
            column: Vec::new(),
        }
    }

    /// Make the column for `hcenter_um` current.
    ///
    /// A request matching the cached Hcenter within tolerance is a cache hit
    /// and performs no source read. On a miss the LUT is re-read and the
    /// cached column replaced. If the source cannot be opened, or the
    /// requested Hcenter has no column, the previous column AND the previous
    /// cached Hcenter stay in place; the condition is only logged.
    pub fn load(&mut self, hcenter_um: f64) {
        if let Some(cached) = self.cached_hcenter_um {
            if (cached - hcenter_um).abs() < self.tolerance_um {
                return;
            }
        }

        let file = match File::open(&self.source) {
            Ok(file) => file,
            Err(err) => {
                error!("error opening LUT source {}: {err}", self.source.display());
                return;
            }
        };
        let table = match LutTable::read(BufReader::new(file), &self.depth_marker) {
            Ok(table) => table,
            Err(err) => {
                error!("error reading LUT source {}: {err}", self.source.display());
                return;
            }
        };

        let Some(index) = table.find_column_index(hcenter_um, self.tolerance_um) else {
            error!("Hcenter {hcenter_um} um not found in LUT");
            return;
        };
        // take_column cannot miss here: the index came from this table.
        let column = match table.take_column(index) {
            Some(column) => column,
            None => return,
        };
        self.column = column.values;
        self.cached_hcenter_um = Some(hcenter_um);
        info!(
            "loaded LUT column for Hcenter = {hcenter_um} um, {} data points",
            self.column.len()
        );
    }

    /// Value at `index`, or 0.0 outside `[0, len)`. Never fails, never logs.
    pub fn get(&self, index: isize) -> f64 {
        if index < 0 || index as usize >= self.column.len() {
            return 0.0;
        }
        self.column[index as usize]
    }

    /// The cached column; empty when nothing has been loaded yet.
    pub fn column(&self) -> &[f64] {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.column.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }

    /// Hcenter the cached column belongs to, if any load ever succeeded.
    pub fn cached_hcenter_um(&self) -> Option<f64> {
        self.cached_hcenter_um
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}
