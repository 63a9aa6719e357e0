//! Visualization mapper: derives chart-ready shapes from panel and result.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every render; no derived state is cached between updates.

use crate::domain::{AnalyteCode, AnalyteRef, Panel, RangeStatus, RiskCategory, RiskResult, RiskScores, TopFactor};

/// Hue of a zero-risk gauge.
pub const HEALTHY_HUE: f64 = 130.0;

/// Hue lost per score point.
const HUE_PER_POINT: f64 = 1.2;

/// Offset of the gradient's second stop.
const SECOND_STOP_OFFSET: f64 = 30.0;

/// One axis of the radar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPoint {
    pub axis: RiskCategory,
    pub score: f64,
}

/// HSL colour with saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    /// Convert to 8-bit RGB. Hue wraps modulo 360.
    #[must_use]
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }
}

/// Two-stop gradient used to fill a risk gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeColor {
    pub start: Hsl,
    pub end: Hsl,
}

/// A single risk gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    pub category: RiskCategory,
    pub label: String,
    pub score: f64,
    pub color: GaugeColor,
}

/// One editable row of the lab panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRow {
    pub code: AnalyteCode,
    pub value: f64,
    pub reference: &'static AnalyteRef,
    pub status: RangeStatus,
}

/// Everything the dashboard renders, derived in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub panel: Vec<PanelRow>,
    pub radar: Vec<RadarPoint>,
    pub gauges: Vec<GaugeView>,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl DashboardView {
    #[must_use]
    pub fn build(panel: &Panel, result: &RiskResult) -> Self {
        Self {
            panel: to_panel_rows(panel),
            radar: to_radar_series(&result.scores),
            gauges: to_gauges(&result.scores),
            factors: result.top_factors.iter().map(factor_label).collect(),
            recommendations: result.recommendations.clone(),
        }
    }
}

/// One point per category, always in [`RiskCategory::ALL`] order.
#[must_use]
pub fn to_radar_series(scores: &RiskScores) -> Vec<RadarPoint> {
    scores
        .iter()
        .map(|(axis, score)| RadarPoint { axis, score })
        .collect()
}

/// Map a score to its gauge gradient.
///
/// The first stop is `130 - 1.2 * score`; the second is 30 degrees further
/// toward red, floored at 0.
#[must_use]
pub fn to_gauge_color(score: f64) -> GaugeColor {
    let hue = HEALTHY_HUE - score * HUE_PER_POINT;
    GaugeColor {
        start: Hsl {
            hue,
            saturation: 100.0,
            lightness: 35.0,
        },
        end: Hsl {
            hue: (hue - SECOND_STOP_OFFSET).max(0.0),
            saturation: 100.0,
            lightness: 40.0,
        },
    }
}

#[must_use]
pub fn to_gauges(scores: &RiskScores) -> Vec<GaugeView> {
    scores
        .iter()
        .map(|(category, score)| GaugeView {
            category,
            label: format!("Risk: {category}"),
            score,
            color: to_gauge_color(score),
        })
        .collect()
}

/// Pill text for a contributing factor, e.g. `GLU: 40%`.
#[must_use]
pub fn factor_label(factor: &TopFactor) -> String {
    format!("{}: {}%", factor.key, format_number(factor.weight))
}

/// Render a number without a trailing `.0` for whole values.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[must_use]
pub fn to_panel_rows(panel: &Panel) -> Vec<PanelRow> {
    panel
        .iter()
        .map(|(code, value)| {
            let reference = code.reference();
            PanelRow {
                code,
                value,
                reference,
                status: reference.classify(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_result() -> RiskResult {
        RiskResult {
            scores: [
                (RiskCategory::Diabetes, 70.0),
                (RiskCategory::Anemia, 10.0),
                (RiskCategory::Liver, 5.0),
                (RiskCategory::Kidney, 5.0),
                (RiskCategory::Thyroid, 20.0),
            ]
            .into_iter()
            .collect(),
            top_factors: vec![TopFactor {
                key: AnalyteCode::Glu,
                weight: 40.0,
            }],
            recommendations: vec!["Consult endocrinologist".to_string()],
        }
    }

    #[test]
    fn test_gauge_color_endpoints() {
        let zero = to_gauge_color(0.0);
        assert_eq!(zero.start.hue, HEALTHY_HUE);
        assert_eq!(zero.end.hue, 100.0);
        assert_eq!(zero.start.lightness, 35.0);
        assert_eq!(zero.end.lightness, 40.0);

        let full = to_gauge_color(100.0);
        assert!((full.start.hue - 10.0).abs() < 1e-9);
        assert_eq!(full.end.hue, 0.0);
    }

    #[test]
    fn test_gauge_second_stop_floors_at_zero() {
        // 130 - 1.2 * 90 = 22, second stop would be -8.
        let color = to_gauge_color(90.0);
        assert!((color.start.hue - 22.0).abs() < 1e-9);
        assert_eq!(color.end.hue, 0.0);
    }

    #[test]
    fn test_gauge_hue_is_monotonic() {
        let mut previous = to_gauge_color(0.0);
        for step in 1..=1000 {
            let color = to_gauge_color(f64::from(step) / 10.0);
            assert!(color.start.hue <= previous.start.hue);
            assert!(color.end.hue <= previous.end.hue);
            previous = color;
        }
    }

    #[test]
    fn test_radar_always_has_five_ordered_points() {
        let empty = to_radar_series(&RiskScores::default());
        let axes: Vec<RiskCategory> = empty.iter().map(|p| p.axis).collect();
        assert_eq!(axes, RiskCategory::ALL.to_vec());
        assert!(empty.iter().all(|p| p.score == 0.0));

        let partial: RiskScores = [(RiskCategory::Thyroid, 33.0)].into_iter().collect();
        let radar = to_radar_series(&partial);
        assert_eq!(radar.len(), 5);
        assert_eq!(radar[4], RadarPoint { axis: RiskCategory::Thyroid, score: 33.0 });
    }

    #[test]
    fn test_dashboard_for_scored_result() {
        let view = DashboardView::build(&Panel::default(), &scenario_result());

        let gauges: Vec<f64> = view.gauges.iter().map(|g| g.score).collect();
        assert_eq!(gauges, vec![70.0, 10.0, 5.0, 5.0, 20.0]);
        assert_eq!(view.gauges[0].label, "Risk: Diabetes");
        assert_eq!(view.radar.len(), 5);
        assert_eq!(view.factors, vec!["GLU: 40%"]);
        assert_eq!(view.recommendations.len(), 1);
        assert_eq!(view.panel.len(), 7);
    }

    #[test]
    fn test_factor_label_keeps_fractions() {
        let factor = TopFactor {
            key: AnalyteCode::Crea,
            weight: 12.5,
        };
        assert_eq!(factor_label(&factor), "CREA: 12.5%");
    }

    #[test]
    fn test_panel_rows_flag_out_of_range_values() {
        let mut panel = Panel::default();
        panel.set_value(AnalyteCode::Glu, "9.4");
        panel.set_value(AnalyteCode::Hgb, "101");
        let rows = to_panel_rows(&panel);

        let status = |code: AnalyteCode| rows.iter().find(|r| r.code == code).map(|r| r.status);
        assert_eq!(status(AnalyteCode::Glu), Some(RangeStatus::Above));
        assert_eq!(status(AnalyteCode::Hgb), Some(RangeStatus::Below));
        assert_eq!(status(AnalyteCode::Tsh), Some(RangeStatus::Normal));
    }

    #[test]
    fn test_hsl_to_rgb_reference_colours() {
        let green = Hsl { hue: 120.0, saturation: 100.0, lightness: 50.0 };
        assert_eq!(green.to_rgb(), (0, 255, 0));
        let red = Hsl { hue: 0.0, saturation: 100.0, lightness: 50.0 };
        assert_eq!(red.to_rgb(), (255, 0, 0));
        let wrapped = Hsl { hue: -240.0, saturation: 100.0, lightness: 50.0 };
        assert_eq!(wrapped.to_rgb(), green.to_rgb());
    }
}
