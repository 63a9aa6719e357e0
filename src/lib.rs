//! # LabRisk
//!
//! Terminal client for a lab-panel disease-risk scoring service.
//!
//! This crate provides:
//! - A typed lab panel with per-analyte reference ranges
//! - A blocking HTTP client for the scoring service
//! - A single-writer controller that owns panel, result and notices
//! - Terminal UI for editing panels and reading risk scores
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Panel, analytes, risk results)
//! - `ports`: Trait definitions for the scoring service
//! - `adapters`: Concrete implementations (reqwest HTTP client, log sanitizer)
//! - `application`: Controller, background worker and view models
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::ClientConfig;
pub use domain::{AnalyteCode, Panel, PatientId, RiskCategory, RiskResult};
pub use ports::{ClientError, ScoringService};

/// Result type for LabRisk operations
pub type Result<T> = std::result::Result<T, LabRiskError>;

/// Main error type for LabRisk
#[derive(Debug, thiserror::Error)]
pub enum LabRiskError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert() {
        fn open() -> Result<()> {
            let raw: std::io::Result<()> =
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no tty"));
            raw?;
            Ok(())
        }
        let err = open().expect_err("io failure");
        assert!(matches!(err, LabRiskError::Io(_)));
        assert_eq!(err.to_string(), "IO error: no tty");
    }
}
