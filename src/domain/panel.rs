//! Panel state: the editable analyte values of one patient.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::analyte::{AnalyteCode, AnalyteError};

/// Full set of analyte values for one patient.
///
/// Backed by a fixed array indexed by [`AnalyteCode`], so every known code
/// always has a value. Values are not range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    values: [f64; 7],
}

impl Default for Panel {
    /// Demo panel shown before any patient is loaded.
    fn default() -> Self {
        Self {
            values: [145.0, 90.0, 5.1, 28.0, 25.0, 85.0, 2.0],
        }
    }
}

impl Panel {
    /// Build a panel from `(code, value)` pairs.
    ///
    /// Later duplicates overwrite earlier ones.
    ///
    /// # Errors
    /// Returns [`AnalyteError::IncompletePanel`] unless all seven codes are set.
    pub fn try_from_entries<I>(entries: I) -> Result<Self, AnalyteError>
    where
        I: IntoIterator<Item = (AnalyteCode, f64)>,
    {
        let mut slots: [Option<f64>; 7] = [None; 7];
        for (code, value) in entries {
            slots[code.index()] = Some(value);
        }

        let missing: Vec<AnalyteCode> = AnalyteCode::ALL
            .iter()
            .copied()
            .filter(|code| slots[code.index()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AnalyteError::IncompletePanel { missing });
        }

        let mut values = [0.0; 7];
        for (slot, value) in values.iter_mut().zip(slots) {
            *slot = value.unwrap_or_default();
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn get(&self, code: AnalyteCode) -> f64 {
        self.values[code.index()]
    }

    /// Parse `raw` and store it under `code`.
    ///
    /// Returns `false` and keeps the previous value when `raw` is not a finite
    /// number (empty input included).
    pub fn set_value(&mut self, code: AnalyteCode, raw: &str) -> bool {
        match parse_value(raw) {
            Some(value) => {
                self.values[code.index()] = value;
                true
            }
            None => false,
        }
    }

    /// Replace every value at once.
    pub fn replace(&mut self, other: Panel) {
        *self = other;
    }

    /// Iterate `(code, value)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (AnalyteCode, f64)> + '_ {
        AnalyteCode::ALL.iter().map(move |code| (*code, self.get(*code)))
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

impl Serialize for Panel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (code, value) in self.iter() {
            map.serialize_entry(code.as_str(), &value)?;
        }
        map.end()
    }
}
