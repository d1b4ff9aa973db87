// ─────────────────────────────────────────────────────────────────────
// TCT Signal Core — Carrier Generator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Turns a depth-density column into discrete electron/hole pairs.

use tct_types::state::{CarrierRequest, CarrierType, DepthAxis, Position3};

pub struct CarrierGenerator {
    axis: DepthAxis,
    sensor_thickness_um: f64,
}

/// Carriers of one event plus the generated-carrier count for reporting.
pub struct GeneratedEvent {
    pub requests: Vec<CarrierRequest>,
    /// Real-valued (pre-truncation) sum of the in-bound densities. Can
    /// differ from the number of emitted pairs, which truncates per bin.
    pub total_carriers: f64,
}

impl CarrierGenerator {
    pub fn new(axis: DepthAxis, sensor_thickness_um: f64) -> Self {
        CarrierGenerator {
            axis,
            sensor_thickness_um,
        }
    }

    /// One electron and one hole per whole carrier in each depth bin.
    ///
    /// Bin i sits at z = (i + 0.5) * bin_width; bins outside
    /// [0, sensor_thickness] are skipped. The pair count truncates the
    /// density toward zero. Fractional carriers are discarded, not
    /// rounded, and the resulting undercount is part of the contract.
    pub fn generate_for_column(
        &self,
        column: &[f64],
        x_um: f64,
        y_um: f64,
        t0_ns: f64,
    ) -> GeneratedEvent {
        let mut requests = Vec::new();
        let mut total_carriers = 0.0;

        for (index, &density) in column.iter().enumerate() {
            let z_um = self.axis.bin_center_um(index);
            if z_um < 0.0 || z_um > self.sensor_thickness_um {
                continue;
            }
            total_carriers += density;

            let pairs = density.trunc() as i64;
            let position = Position3 { x_um, y_um, z_um };
            for _ in 0..pairs.max(0) {
                requests.push(CarrierRequest {
                    kind: CarrierType::Electron,
                    position,
                    t0_ns,
                });
                requests.push(CarrierRequest {
                    kind: CarrierType::Hole,
                    position,
                    t0_ns,
                });
            }
        }

        GeneratedEvent {
            requests,
            total_carriers,
        }
    }
}
