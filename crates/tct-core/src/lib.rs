//! Signal-simulation orchestration engine.
//!
//! LUT-driven carrier generation, the time-indexed weighting-potential
//! series, per-event signal accumulation and the sweep driver.

pub mod generator;
pub mod oracle;
pub mod signal;
pub mod sweep;
pub mod weighting;
