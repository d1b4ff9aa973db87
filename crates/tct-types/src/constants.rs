// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Elementary charge (C)
pub const ELEMENTARY_CHARGE_C: f64 = 1.602_176_634e-19;

/// Elementary charge magnitude (fC) - the unit the signal report uses.
pub const ELEMENTARY_CHARGE_FC: f64 = 1.602_176_634e-4;

/// Hcenter match tolerance (µm) when locating a LUT column.
pub const HCENTER_TOLERANCE_UM: f64 = 1e-6;

/// Reference sensor thickness (µm).
pub const SENSOR_THICKNESS_UM: f64 = 500.0;

/// Depth bin width of the LUT column (µm).
pub const LUT_BIN_WIDTH_UM: f64 = 1.0;

/// Signal histogram bin count.
pub const N_SIGNAL_BINS: usize = 2000;

/// Signal histogram bin width (ns).
pub const SIGNAL_BIN_WIDTH_NS: f64 = 0.005;

/// Weighting-potential time steps: one prompt snapshot plus 20 dynamic ones.
pub const N_TIME_STEPS: usize = 21;
