// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Uniform depth binning of a LUT column.
/// Bin i is centered at (i + 0.5) * bin_width_um.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAxis {
    pub bin_width_um: f64,
}

impl DepthAxis {
    pub fn new(bin_width_um: f64) -> Self {
        DepthAxis { bin_width_um }
    }

    /// Depth of the center of bin `index` (µm).
    pub fn bin_center_um(&self, index: usize) -> f64 {
        (index as f64 + 0.5) * self.bin_width_um
    }
}

/// Fixed output time window of the signal histogram, starting at t = 0.
/// Bin i covers [i * t_step_ns, (i + 1) * t_step_ns).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub t_step_ns: f64,
    pub n_bins: usize,
}

impl TimeWindow {
    pub fn new(t_step_ns: f64, n_bins: usize) -> Self {
        TimeWindow { t_step_ns, n_bins }
    }

    /// Time at the center of bin `index` (ns).
    pub fn bin_center_ns(&self, index: usize) -> f64 {
        (index as f64 + 0.5) * self.t_step_ns
    }

    /// Bin containing time `t_ns`, or None when outside the window.
    pub fn bin_index(&self, t_ns: f64) -> Option<usize> {
        if !t_ns.is_finite() || t_ns < 0.0 {
            return None;
        }
        let index = (t_ns / self.t_step_ns).floor() as usize;
        if index < self.n_bins {
            Some(index)
        } else {
            None
        }
    }

    /// Total window span (ns).
    pub fn span_ns(&self) -> f64 {
        self.t_step_ns * self.n_bins as f64
    }
}

/// Carrier species. Electrons and holes induce signal with opposite sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierType {
    Electron,
    Hole,
}

impl CarrierType {
    /// Signed charge in units of the elementary charge.
    pub fn charge_sign(&self) -> f64 {
        match self {
            CarrierType::Electron => -1.0,
            CarrierType::Hole => 1.0,
        }
    }
}

/// A point inside the sensor (µm). z = 0 is the illuminated face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position3 {
    pub x_um: f64,
    pub y_um: f64,
    pub z_um: f64,
}

/// One carrier handed to the transport oracle. Consumed immediately,
/// never retained across events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierRequest {
    pub kind: CarrierType,
    pub position: Position3,
    pub t0_ns: f64,
}

/// One readout sample of the induced-current histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSample {
    pub time_ns: f64,
    pub total: f64,
    pub electron: f64,
    pub hole: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_axis_bin_centers() {
        let axis = DepthAxis::new(1.0);
        assert!((axis.bin_center_um(0) - 0.5).abs() < 1e-12);
        assert!((axis.bin_center_um(1) - 1.5).abs() < 1e-12);
        assert!((axis.bin_center_um(499) - 499.5).abs() < 1e-12);
    }

    #[test]
    fn test_time_window_bin_index() {
        let window = TimeWindow::new(0.005, 2000);
        assert_eq!(window.bin_index(0.0), Some(0));
        assert_eq!(window.bin_index(0.0049), Some(0));
        assert_eq!(window.bin_index(0.005), Some(1));
        assert_eq!(window.bin_index(9.9999), Some(1999));
        assert_eq!(window.bin_index(10.0), None);
        assert_eq!(window.bin_index(-0.001), None);
        assert_eq!(window.bin_index(f64::NAN), None);
    }

    #[test]
    fn test_time_window_span() {
        let window = TimeWindow::new(0.005, 2000);
        assert!((window.span_ns() - 10.0).abs() < 1e-12);
        assert!((window.bin_center_ns(0) - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_charge_signs_are_opposite() {
        assert_eq!(CarrierType::Electron.charge_sign(), -1.0);
        assert_eq!(CarrierType::Hole.charge_sign(), 1.0);
    }
}
