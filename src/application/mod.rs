//! Application layer: Use cases and services.
//!
//! This module sequences remote calls, owns session state and derives the
//! view models the TUI renders.

mod controller;
pub mod view;
mod worker;

pub use controller::{LabController, Notice, NoticeKind, Phase, ServiceStatus};
pub use view::DashboardView;
pub use worker::{RemoteEvent, RemoteWorker};
