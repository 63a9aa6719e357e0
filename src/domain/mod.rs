//! Domain layer: Core types for lab panels and risk results.
//!
//! Pure Rust types with no I/O. Panels and scores are array-backed so every
//! known key is always present.

mod analyte;
mod panel;
mod patient;
mod risk;

pub use analyte::{range_of, AnalyteCode, AnalyteError, AnalyteRef, RangeStatus};
pub use panel::Panel;
pub use patient::{PatientId, ServiceHealth};
pub use risk::{RiskCategory, RiskResult, RiskScores, TopFactor};
