//! Reference catalog: analyte codes, normal ranges and units.
//!
//! The code set is fixed. Ranges are the adult reference bands used by the
//! scoring service and are only displayed by the client, never enforced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Laboratory analyte measured in a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalyteCode {
    /// Hemoglobin
    Hgb,
    /// Mean corpuscular volume
    Mcv,
    /// Glucose
    Glu,
    /// Alanine aminotransferase
    Alt,
    /// Aspartate aminotransferase
    Ast,
    /// Creatinine
    Crea,
    /// Thyroid-stimulating hormone
    Tsh,
}

impl AnalyteCode {
    /// Every known code, in display order.
    pub const ALL: [AnalyteCode; 7] = [
        Self::Hgb,
        Self::Mcv,
        Self::Glu,
        Self::Alt,
        Self::Ast,
        Self::Crea,
        Self::Tsh,
    ];

    /// Wire/display name of the code (`"HGB"`, `"GLU"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hgb => "HGB",
            Self::Mcv => "MCV",
            Self::Glu => "GLU",
            Self::Alt => "ALT",
            Self::Ast => "AST",
            Self::Crea => "CREA",
            Self::Tsh => "TSH",
        }
    }

    /// Position of the code inside [`AnalyteCode::ALL`].
    #[must_use]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    /// Reference range for this code. Total over the code set.
    #[must_use]
    pub fn reference(&self) -> &'static AnalyteRef {
        &REFERENCE_CATALOG[self.index()]
    }
}

impl fmt::Display for AnalyteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyteCode {
    type Err = AnalyteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| AnalyteError::UnknownAnalyte(s.to_string()))
    }
}

/// Normal range and unit of one analyte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyteRef {
    pub code: AnalyteCode,
    pub low: f64,
    pub high: f64,
    pub unit: &'static str,
}

/// Where a value sits relative to its reference band (bounds inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    Below,
    Normal,
    Above,
}

impl AnalyteRef {
    #[must_use]
    pub fn classify(&self, value: f64) -> RangeStatus {
        if value < self.low {
            RangeStatus::Below
        } else if value > self.high {
            RangeStatus::Above
        } else {
            RangeStatus::Normal
        }
    }
}

/// Errors raised by the catalog and by panel construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyteError {
    #[error("unknown analyte code: {0}")]
    UnknownAnalyte(String),

    #[error("panel is missing values for: {}", join_codes(.missing))]
    IncompletePanel { missing: Vec<AnalyteCode> },
}

fn join_codes(codes: &[AnalyteCode]) -> String {
    codes
        .iter()
        .map(AnalyteCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Indexed by `AnalyteCode::index()`.
static REFERENCE_CATALOG: [AnalyteRef; 7] = [
    AnalyteRef { code: AnalyteCode::Hgb, low: 120.0, high: 170.0, unit: "g/L" },
    AnalyteRef { code: AnalyteCode::Mcv, low: 80.0, high: 100.0, unit: "fL" },
    AnalyteRef { code: AnalyteCode::Glu, low: 3.9, high: 6.0, unit: "mmol/L" },
    AnalyteRef { code: AnalyteCode::Alt, low: 0.0, high: 45.0, unit: "U/L" },
    AnalyteRef { code: AnalyteCode::Ast, low: 0.0, high: 45.0, unit: "U/L" },
    AnalyteRef { code: AnalyteCode::Crea, low: 62.0, high: 106.0, unit: "µmol/L" },
    AnalyteRef { code: AnalyteCode::Tsh, low: 0.4, high: 4.0, unit: "mIU/L" },
];

/// Look up the reference range of an analyte by its wire name.
///
/// # Errors
/// Returns [`AnalyteError::UnknownAnalyte`] for any name outside the fixed set.
pub fn range_of(code: &str) -> Result<&'static AnalyteRef, AnalyteError> {
    code.parse::<AnalyteCode>().map(|c| c.reference())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_code() {
        for code in AnalyteCode::ALL {
            assert_eq!(code.reference().code, code);
        }
    }

    #[test]
    fn test_every_range_is_ordered() {
        for code in AnalyteCode::ALL {
            let r = code.reference();
            assert!(r.low < r.high, "{code}: {} !< {}", r.low, r.high);
        }
    }

    #[test]
    fn test_range_of_known_code() {
        let glu = range_of("GLU").expect("GLU is known");
        assert!((glu.low - 3.9).abs() < f64::EPSILON);
        assert!((glu.high - 6.0).abs() < f64::EPSILON);
        assert_eq!(glu.unit, "mmol/L");
    }

    #[test]
    fn test_range_of_unknown_code() {
        assert_eq!(
            range_of("LDL"),
            Err(AnalyteError::UnknownAnalyte("LDL".to_string()))
        );
        // Names are case-sensitive on the wire.
        assert!(range_of("glu").is_err());
    }

    #[test]
    fn test_classify_inclusive_bounds() {
        let tsh = AnalyteCode::Tsh.reference();
        assert_eq!(tsh.classify(0.39), RangeStatus::Below);
        assert_eq!(tsh.classify(0.4), RangeStatus::Normal);
        assert_eq!(tsh.classify(4.0), RangeStatus::Normal);
        assert_eq!(tsh.classify(4.1), RangeStatus::Above);
    }

    #[test]
    fn test_incomplete_panel_message() {
        let err = AnalyteError::IncompletePanel {
            missing: vec![AnalyteCode::Alt, AnalyteCode::Tsh],
        };
        assert_eq!(err.to_string(), "panel is missing values for: ALT, TSH");
    }
}
