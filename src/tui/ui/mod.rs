//! UI module: View components for the TUI.

pub mod insights;
pub mod panel;
pub mod risk;

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::application::{DashboardView, Notice, ServiceStatus};
use crate::domain::PatientId;
use crate::tui::styles::LabTheme;

use self::panel::PanelEditorState;

/// Everything one frame needs, borrowed from the controller.
pub struct Screen<'a> {
    pub view: &'a DashboardView,
    pub directory: &'a [PatientId],
    pub selected: Option<&'a PatientId>,
    pub loaded: Option<&'a PatientId>,
    pub status: &'a ServiceStatus,
    pub loading: bool,
    pub scored_at: Option<DateTime<Utc>>,
    pub notice: Option<&'a Notice>,
    pub editor: &'a PanelEditorState,
}

pub fn render_screen(f: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Patient selector
            Constraint::Min(0),    // Panels
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], screen);
    render_selector(f, chunks[1], screen);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[2]);

    panel::render_panel(f, columns[0], &screen.view.panel, screen.editor);
    risk::render_risk(f, columns[1], &screen.view.gauges, &screen.view.radar);
    insights::render_insights(
        f,
        columns[2],
        &screen.view.factors,
        &screen.view.recommendations,
    );

    render_key_hints(f, chunks[3], screen);

    if let Some(notice) = screen.notice {
        render_notice(f, area, notice);
    }
}

fn render_header(f: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let status = match screen.status {
        ServiceStatus::Unknown => Span::styled("connecting…", LabTheme::text_muted()),
        ServiceStatus::Online(health) => Span::styled(
            format!("service online · {} records", health.records),
            LabTheme::success(),
        ),
        ServiceStatus::Unreachable(_) => Span::styled("service unreachable", LabTheme::danger()),
    };

    let mut spans = vec![
        Span::styled(" ", LabTheme::text()),
        Span::styled("LabRisk", LabTheme::title()),
        Span::styled(" │ ", LabTheme::text_muted()),
        Span::styled("Personal risk estimate from lab data", LabTheme::text_secondary()),
        Span::styled(" │ ", LabTheme::text_muted()),
        status,
    ];
    if let Some(at) = screen.scored_at {
        spans.push(Span::styled(" │ ", LabTheme::text_muted()));
        spans.push(Span::styled(
            format!("scored {}", at.with_timezone(&Local).format("%H:%M:%S")),
            LabTheme::text_secondary(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(LabTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_selector(f: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let mut spans = vec![Span::styled(" Patient: ", LabTheme::text_secondary())];

    if screen.directory.is_empty() {
        spans.push(Span::styled("no patients available", LabTheme::text_muted()));
    } else {
        let position = screen
            .selected
            .and_then(|id| screen.directory.iter().position(|d| d == id));
        match (screen.selected, position) {
            (Some(id), Some(pos)) => {
                spans.push(Span::styled("◀ ", LabTheme::key_hint()));
                spans.push(Span::styled(format!("Patient {id}"), LabTheme::focused()));
                spans.push(Span::styled(" ▶", LabTheme::key_hint()));
                spans.push(Span::styled(
                    format!("  ({}/{})", pos + 1, screen.directory.len()),
                    LabTheme::text_muted(),
                ));
            }
            (Some(id), None) => {
                spans.push(Span::styled(format!("Patient {id}"), LabTheme::focused()));
            }
            (None, _) => spans.push(Span::styled(
                format!("choose a patient ({} available)", screen.directory.len()),
                LabTheme::text_muted(),
            )),
        }
    }

    spans.push(Span::styled("   Showing: ", LabTheme::text_secondary()));
    spans.push(match screen.loaded {
        Some(id) => Span::styled(format!("Patient {id}"), LabTheme::text()),
        None => Span::styled("demo panel", LabTheme::text_muted()),
    });

    spans.push(Span::raw("   "));
    if screen.loading {
        spans.push(Span::styled("Scoring...", LabTheme::warning()));
    } else {
        spans.push(Span::styled("Ready", LabTheme::success()));
    }

    let selector = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(LabTheme::border()),
    );
    f.render_widget(selector, area);
}

fn render_key_hints(f: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let predict_label = if screen.loading { "Scoring... " } else { "Calculate risk " };
    let hints = Line::from(vec![
        Span::styled(" [←→] ", LabTheme::key_hint()),
        Span::styled("Patient ", LabTheme::key_desc()),
        Span::styled("[L] ", LabTheme::key_hint()),
        Span::styled("Load ", LabTheme::key_desc()),
        Span::styled("[P] ", LabTheme::key_hint()),
        Span::styled(predict_label, LabTheme::key_desc()),
        Span::styled("[↑↓] ", LabTheme::key_hint()),
        Span::styled("Field ", LabTheme::key_desc()),
        Span::styled("[0-9.-] ", LabTheme::key_hint()),
        Span::styled("Edit ", LabTheme::key_desc()),
        Span::styled("[Q] ", LabTheme::key_hint()),
        Span::styled("Quit", LabTheme::key_desc()),
    ]);

    let footer = Paragraph::new(hints).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(LabTheme::border()),
    );
    f.render_widget(footer, area);
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let popup = centered(area, 60, 7);
    let content = Paragraph::new(vec![
        Line::from(Span::styled(notice.message.clone(), LabTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Esc] ", LabTheme::key_hint()),
            Span::styled("Dismiss", LabTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(format!(" ! {} ", notice.title()), LabTheme::danger()))
            .borders(Borders::ALL)
            .border_style(LabTheme::danger()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(content, popup);
}

/// Rect of `width_pct`% width and `height` rows centred in `area`.
fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "Prototype. Scores are indicative only and are not a medical diagnosis.",
        LabTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(LabTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
