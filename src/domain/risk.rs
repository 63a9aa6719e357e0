//! Risk result types returned by the scoring service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::analyte::AnalyteCode;

/// Disease-risk axis scored by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Diabetes,
    Anemia,
    Liver,
    Kidney,
    Thyroid,
}

impl RiskCategory {
    /// Fixed axis order used by every chart.
    pub const ALL: [RiskCategory; 5] = [
        Self::Diabetes,
        Self::Anemia,
        Self::Liver,
        Self::Kidney,
        Self::Thyroid,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Anemia => "Anemia",
            Self::Liver => "Liver",
            Self::Kidney => "Kidney",
            Self::Thyroid => "Thyroid",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown risk category: {s}"))
    }
}

/// Score (0-100) per risk category. Categories never reported read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskScores {
    values: [f64; 5],
}

impl RiskScores {
    #[must_use]
    pub fn get(&self, category: RiskCategory) -> f64 {
        self.values[category.index()]
    }

    pub fn set(&mut self, category: RiskCategory, score: f64) {
        self.values[category.index()] = score;
    }

    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, f64)> + '_ {
        RiskCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl FromIterator<(RiskCategory, f64)> for RiskScores {
    fn from_iter<T: IntoIterator<Item = (RiskCategory, f64)>>(iter: T) -> Self {
        let mut scores = Self::default();
        for (category, score) in iter {
            scores.set(category, score);
        }
        scores
    }
}

/// Analyte named by the service as a major contributor, with its weight in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopFactor {
    pub key: AnalyteCode,
    pub weight: f64,
}

/// Last scoring outcome: scores, ranked factors and free-text recommendations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskResult {
    pub scores: RiskScores,
    pub top_factors: Vec<TopFactor>,
    pub recommendations: Vec<String>,
}

impl RiskResult {
    /// True for the zero/empty value shown before any prediction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_all_zero() && self.top_factors.is_empty() && self.recommendations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_is_empty() {
        let result = RiskResult::default();
        assert!(result.is_empty());
        for category in RiskCategory::ALL {
            assert_eq!(result.scores.get(category), 0.0);
        }
    }

    #[test]
    fn test_scores_collect_missing_as_zero() {
        let scores: RiskScores = [(RiskCategory::Liver, 42.0)].into_iter().collect();
        assert_eq!(scores.get(RiskCategory::Liver), 42.0);
        assert_eq!(scores.get(RiskCategory::Diabetes), 0.0);
        assert!(!scores.is_all_zero());
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in RiskCategory::ALL {
            assert_eq!(category.as_str().parse::<RiskCategory>(), Ok(category));
        }
        assert!("Heart".parse::<RiskCategory>().is_err());
    }

    #[test]
    fn test_recommendations_make_result_non_empty() {
        let result = RiskResult {
            recommendations: vec!["Recheck fasting glucose".to_string()],
            ..RiskResult::default()
        };
        assert!(!result.is_empty());
    }
}
