// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — LUT Table Reader
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Comma-separated carrier-generation lookup table.
//!
//! The header row is the first row whose leading token equals the depth-axis
//! marker; every following token is one sweep-parameter column. Data rows
//! carry one value per depth bin. Lines before the header, blank lines and
//! `#` comments are skipped.

use std::io::BufRead;

use tct_types::error::TctResult;

/// One sweep-parameter column extracted from the LUT.
#[derive(Debug, Clone)]
pub struct LutColumn {
    /// Header value of the column, when it parsed as a number.
    /// Columns with unparsable headers keep their index but never match.
    pub parameter_um: Option<f64>,
    /// Data-row values in depth order; unparsable cells default to 0.0.
    pub values: Vec<f64>,
}

/// Parsed LUT. The depth-axis column itself is dropped; every remaining
/// header column becomes a [`LutColumn`].
#[derive(Debug, Clone)]
pub struct LutTable {
    columns: Vec<LutColumn>,
}

impl LutTable {
    /// Parse the table from a line-oriented reader.
    ///
    /// A source without a header row yields an empty table, which no
    /// parameter can match; the caller decides how loudly to complain.
    pub fn read<R: BufRead>(reader: R, depth_marker: &str) -> TctResult<LutTable> {
        let mut columns: Vec<LutColumn> = Vec::new();
        let mut header_seen = false;

        for line in reader.lines() {
            let line = line?;
            if !header_seen {
                let mut cells = line.split(',');
                let leading = cells.next().unwrap_or("").trim();
                if leading != depth_marker {
                    continue;
                }
                header_seen = true;
                columns = cells
                    .map(|cell| LutColumn {
                        parameter_um: cell.trim().parse::<f64>().ok(),
                        values: Vec::new(),
                    })
                    .collect();
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            // Cell 0 is the depth axis; short rows contribute nothing to
            // the columns they do not reach.
            for (column, cell) in columns.iter_mut().zip(line.split(',').skip(1)) {
                column.values.push(cell.trim().parse::<f64>().unwrap_or(0.0));
            }
        }

        Ok(LutTable { columns })
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column whose header matches `parameter_um`
    /// within `tolerance_um`.
    pub fn find_column_index(&self, parameter_um: f64, tolerance_um: f64) -> Option<usize> {
        self.columns.iter().position(|column| {
            column
                .parameter_um
                .is_some_and(|p| (p - parameter_um).abs() < tolerance_um)
        })
    }

    pub fn column(&self, index: usize) -> Option<&LutColumn> {
        self.columns.get(index)
    }

    /// Consume the table, handing out one column.
    pub fn take_column(mut self, index: usize) -> Option<LutColumn> {
        if index < self.columns.len() {
            Some(self.columns.swap_remove(index))
        } else {
            None
        }
    }
}
