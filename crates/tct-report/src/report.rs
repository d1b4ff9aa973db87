// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Report Writer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Append-only event report: one fixed-format block per sweep parameter.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tct_types::constants::ELEMENTARY_CHARGE_FC;
use tct_types::error::TctResult;
use tct_types::state::SignalSample;

const SEPARATOR: &str = "********************************************";

/// Report file name for a probe position.
pub fn report_file_name(x_um: f64, y_um: f64) -> String {
    format!("TPA_simulation_x{x_um}_y{y_um}.txt")
}

pub struct ReportWriter<W: Write> {
    out: W,
}

impl ReportWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> TctResult<Self> {
        Ok(ReportWriter::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        ReportWriter { out }
    }

    /// Append one event block: header, separator, one line per signal bin.
    /// The reported total charge is the carrier count times the elementary
    /// charge, in fC.
    pub fn write_event(
        &mut self,
        hcenter_um: f64,
        x_um: f64,
        y_um: f64,
        total_carriers: f64,
        histogram: &[SignalSample],
    ) -> TctResult<()> {
        writeln!(
            self.out,
            "Hcenter = {hcenter_um} um  x0 = {x_um} um  y0 = {y_um} um  \
             TPA_carriers = {total_carriers} q_total = {} fC",
            total_carriers * ELEMENTARY_CHARGE_FC
        )?;
        writeln!(self.out, "{SEPARATOR}")?;
        for sample in histogram {
            writeln!(
                self.out,
                "{}  {}  {}  {}",
                sample.time_ns, sample.total, sample.electron, sample.hole
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
