//! Contributing factors and recommendations.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::LabTheme;

pub fn render_insights(f: &mut Frame, area: Rect, factors: &[String], recommendations: &[String]) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Top factors (deviation from reference midpoint):",
            LabTheme::text_secondary(),
        )),
        Line::from(""),
    ];

    if factors.is_empty() {
        lines.push(Line::from(Span::styled("  none yet", LabTheme::text_muted())));
    } else {
        let mut pills = vec![Span::raw(" ")];
        for factor in factors {
            pills.push(Span::styled(format!(" {factor} "), LabTheme::pill()));
            pills.push(Span::raw(" "));
        }
        lines.push(Line::from(pills));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Recommendations:", LabTheme::text_secondary())));
    lines.push(Line::from(""));

    if recommendations.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Run a risk calculation to see recommendations.",
            LabTheme::text_muted(),
        )));
    } else {
        for recommendation in recommendations {
            lines.push(Line::from(vec![
                Span::styled(" • ", LabTheme::focused()),
                Span::styled(recommendation.clone(), LabTheme::text()),
            ]));
        }
    }

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Explanation & Recommendations ", LabTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(LabTheme::border()),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(content, area);
}
