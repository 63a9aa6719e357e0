//! Editable lab panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::application::view::{format_number, PanelRow};
use crate::domain::{AnalyteCode, Panel};
use crate::tui::styles::LabTheme;

/// Focus and in-progress text of the panel editor.
///
/// The buffer only mirrors what the operator is typing; the committed value
/// always lives in the controller's panel.
#[derive(Debug, Default)]
pub struct PanelEditorState {
    focused: usize,
    buffer: String,
    dirty: bool,
    pub rejected: bool,
}

impl PanelEditorState {
    #[must_use]
    pub fn focused_code(&self) -> AnalyteCode {
        AnalyteCode::ALL[self.focused]
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % AnalyteCode::ALL.len();
        self.reset();
    }

    pub fn prev_field(&mut self) {
        if self.focused == 0 {
            self.focused = AnalyteCode::ALL.len() - 1;
        } else {
            self.focused -= 1;
        }
        self.reset();
    }

    /// Append a character typed into the focused field.
    ///
    /// Starts from the committed value on the first keystroke. Returns `false`
    /// for characters that cannot be part of a number.
    pub fn input_char(&mut self, c: char, panel: &Panel) -> bool {
        if !(c.is_ascii_digit() || c == '.' || c == '-') {
            return false;
        }
        self.begin(panel);
        self.buffer.push(c);
        true
    }

    pub fn delete_char(&mut self, panel: &Panel) {
        self.begin(panel);
        self.buffer.pop();
    }

    pub fn clear_field(&mut self) {
        self.buffer.zeroize();
        self.dirty = true;
    }

    /// Drop the in-progress text, e.g. after the panel was replaced.
    pub fn reset(&mut self) {
        self.buffer.zeroize();
        self.dirty = false;
        self.rejected = false;
    }

    fn begin(&mut self, panel: &Panel) {
        if !self.dirty {
            self.buffer = format_number(panel.get(self.focused_code()));
            self.dirty = true;
        }
    }

    fn display_for(&self, row: &PanelRow) -> String {
        if self.dirty && row.code == self.focused_code() {
            self.buffer.clone()
        } else {
            format_number(row.value)
        }
    }
}

/// Render the panel as two columns of analyte cards.
pub fn render_panel(f: &mut Frame, area: Rect, rows: &[PanelRow], editor: &PanelEditorState) {
    let block = Block::default()
        .title(Span::styled(" Lab Panel ", LabTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(LabTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let mid = (rows.len() + 1) / 2;
    render_column(f, columns[0], &rows[..mid], editor);
    render_column(f, columns[1], &rows[mid..], editor);
}

fn render_column(f: &mut Frame, area: Rect, rows: &[PanelRow], editor: &PanelEditorState) {
    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(4))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, chunk) in rows.iter().zip(chunks.iter()) {
        let is_focused = row.code == editor.focused_code();
        let (border_style, title_style) = if is_focused {
            (LabTheme::border_focused(), LabTheme::focused())
        } else {
            (LabTheme::border(), LabTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ({}) ", row.code, row.reference.unit),
                title_style,
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut value_line = vec![
            Span::raw(" "),
            Span::styled(editor.display_for(row), LabTheme::range_status(row.status)),
        ];
        if is_focused {
            value_line.push(Span::styled("▌", LabTheme::cursor()));
            if editor.rejected {
                value_line.push(Span::styled("  not a number", LabTheme::danger()));
            }
        }

        let content = Paragraph::new(vec![
            Line::from(value_line),
            Line::from(Span::styled(
                format!(
                    " Ref: {}–{}",
                    format_number(row.reference.low),
                    format_number(row.reference.high)
                ),
                LabTheme::text_muted(),
            )),
        ])
        .block(block);

        f.render_widget(content, *chunk);
    }
}
