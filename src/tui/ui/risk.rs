//! Risk gauges and radar chart.

use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::application::view::{format_number, GaugeColor, GaugeView, Hsl, RadarPoint};
use crate::tui::styles::LabTheme;

const GAUGE_HEIGHT: u16 = 3;

pub fn render_risk(f: &mut Frame, area: Rect, gauges: &[GaugeView], radar: &[RadarPoint]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(GAUGE_HEIGHT * gauges.len() as u16 + 2),
        ])
        .split(area);

    render_radar(f, chunks[0], radar);
    render_gauges(f, chunks[1], gauges);
}

/// Axis direction of point `i` out of `n`, first axis pointing up.
fn axis_unit(i: usize, n: usize) -> (f64, f64) {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    (angle.cos(), angle.sin())
}

fn render_radar(f: &mut Frame, area: Rect, radar: &[RadarPoint]) {
    let n = radar.len().max(1);
    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Profile ", LabTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(LabTheme::border()),
        )
        .marker(Marker::Braille)
        .x_bounds([-1.6, 1.6])
        .y_bounds([-1.3, 1.3])
        .paint(move |ctx| {
            // Grid rings at 25/50/75/100.
            for ring in 1..=4 {
                let r = f64::from(ring) / 4.0;
                for i in 0..n {
                    let (x1, y1) = axis_unit(i, n);
                    let (x2, y2) = axis_unit((i + 1) % n, n);
                    ctx.draw(&CanvasLine::new(x1 * r, y1 * r, x2 * r, y2 * r, LabTheme::TEXT_MUTED));
                }
            }
            for i in 0..n {
                let (x, y) = axis_unit(i, n);
                ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, LabTheme::TEXT_MUTED));
            }

            ctx.layer();

            let scaled: Vec<(f64, f64)> = radar
                .iter()
                .enumerate()
                .map(|(i, point)| {
                    let (x, y) = axis_unit(i, n);
                    let r = point.score.clamp(0.0, 100.0) / 100.0;
                    (x * r, y * r)
                })
                .collect();
            for (i, (x1, y1)) in scaled.iter().enumerate() {
                let (x2, y2) = scaled[(i + 1) % scaled.len()];
                ctx.draw(&CanvasLine::new(*x1, *y1, x2, y2, LabTheme::PRIMARY));
            }

            for (i, point) in radar.iter().enumerate() {
                let (x, y) = axis_unit(i, n);
                let label = format!("{} {}", point.axis, format_number(point.score));
                ctx.print(
                    x * 1.12 - 0.25,
                    y * 1.12,
                    Span::styled(label, LabTheme::text_secondary()),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_gauges(f: &mut Frame, area: Rect, gauges: &[GaugeView]) {
    let block = Block::default()
        .title(Span::styled(" Risk Scores ", LabTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(LabTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = gauges
        .iter()
        .map(|_| Constraint::Length(GAUGE_HEIGHT))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (gauge, row) in gauges.iter().zip(rows.iter()) {
        let bar_width = row.width.saturating_sub(2) as usize;
        let content = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(format!(" {}", gauge.label), LabTheme::text()),
                Span::styled(
                    format!("  {}%", format_number(gauge.score)),
                    Style::default().fg(LabTheme::hsl(gauge.color.start)),
                ),
            ]),
            gradient_bar(bar_width, gauge.score, &gauge.color),
        ]);
        f.render_widget(content, *row);
    }
}

/// Filled cells fade from the gradient's first stop to its second.
fn gradient_bar(width: usize, score: f64, color: &GaugeColor) -> Line<'static> {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let mut spans = vec![Span::raw(" ")];
    for i in 0..width {
        if i < filled {
            let t = if filled > 1 { i as f64 / (filled - 1) as f64 } else { 0.0 };
            let cell = lerp(color.start, color.end, t);
            spans.push(Span::styled("█", Style::default().fg(LabTheme::hsl(cell))));
        } else {
            spans.push(Span::styled("░", LabTheme::text_muted()));
        }
    }
    Line::from(spans)
}

fn lerp(a: Hsl, b: Hsl, t: f64) -> Hsl {
    let mix = |x: f64, y: f64| x + (y - x) * t;
    Hsl {
        hue: mix(a.hue, b.hue),
        saturation: mix(a.saturation, b.saturation),
        lightness: mix(a.lightness, b.lightness),
    }
}
