//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the lab-panel dashboard:
//! - Patient selector and service status
//! - Editable analyte panel
//! - Risk radar, gauges, factors and recommendations

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::LabTheme;
