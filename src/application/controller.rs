//! Orchestration controller: the single owner of session state.
//!
//! User actions (select, load, predict, edit) are handled synchronously and
//! may issue remote calls through the [`RemoteWorker`]. Their outcomes are
//! applied one at a time when the UI loop drains events via [`LabController::poll`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{AnalyteCode, Panel, PatientId, RiskResult, ServiceHealth};
use crate::ports::{ClientError, ScoringService};

use super::view::DashboardView;
use super::worker::{RemoteEvent, RemoteWorker};

/// Whether a scoring request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Predict in flight; further Predict requests are ignored.
    Loading,
}

/// What a [`Notice`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    PatientNotFound,
    LoadFailed,
    PredictFailed,
}

/// Blocking user-visible message raised by a failed action.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::PatientNotFound => "Patient not found",
            NoticeKind::LoadFailed => "Could not load patient",
            NoticeKind::PredictFailed => "Risk request failed",
        }
    }
}

/// Last known state of the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    Unknown,
    Online(ServiceHealth),
    Unreachable(String),
}

/// Session state machine for one operator.
pub struct LabController<S> {
    worker: RemoteWorker<S>,
    panel: Panel,
    result: RiskResult,
    scored_at: Option<DateTime<Utc>>,
    directory: Vec<PatientId>,
    selected: Option<PatientId>,
    loaded: Option<PatientId>,
    status: ServiceStatus,
    phase: Phase,
    /// Sequence number of the most recently issued patient load.
    load_seq: u64,
    notice: Option<Notice>,
}

impl<S> LabController<S>
where
    S: ScoringService + 'static,
{
    /// Create a controller holding the demo panel and an empty result.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            worker: RemoteWorker::new(service),
            panel: Panel::default(),
            result: RiskResult::default(),
            scored_at: None,
            directory: Vec::new(),
            selected: None,
            loaded: None,
            status: ServiceStatus::Unknown,
            phase: Phase::Idle,
            load_seq: 0,
            notice: None,
        }
    }

    /// Request the patient directory and a health probe.
    pub fn start(&mut self) {
        tracing::info!("Requesting patient directory");
        self.worker.list_patients();
        self.worker.health();
    }

    /// Remember `id` as the patient to load next. No network effect.
    pub fn select_patient(&mut self, id: PatientId) {
        self.selected = Some(id);
    }

    /// Select the directory entry after the current one (wrapping).
    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    /// Select the directory entry before the current one (wrapping).
    pub fn select_previous(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        let len = self.directory.len();
        if len == 0 {
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|id| self.directory.iter().position(|d| d == id));
        let next = match current {
            Some(pos) => (pos as isize + delta).rem_euclid(len as isize) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.selected = Some(self.directory[next].clone());
    }

    /// Store a raw edit. Returns `false` (and keeps the old value) when
    /// `raw` is not a number.
    pub fn edit_value(&mut self, code: AnalyteCode, raw: &str) -> bool {
        let stored = self.panel.set_value(code, raw);
        if !stored {
            tracing::debug!(analyte = %code, "Ignoring non-numeric edit");
        }
        stored
    }

    /// Fetch the selected patient's panel.
    ///
    /// Returns `false` without any effect when no patient is selected.
    pub fn load_patient(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        self.load_seq += 1;
        tracing::info!(seq = self.load_seq, "Loading patient {}", id);
        self.worker.fetch_patient(self.load_seq, id);
        true
    }

    /// Submit the current panel for scoring.
    ///
    /// Returns `false` when a scoring request is already outstanding.
    pub fn predict(&mut self) -> bool {
        if self.phase == Phase::Loading {
            return false;
        }
        self.phase = Phase::Loading;
        tracing::info!("Submitting panel for scoring");
        self.worker.submit_for_scoring(self.panel);
        true
    }

    /// Apply every event that has already arrived. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.worker.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Block up to `timeout` for one event and apply it.
    pub fn wait_event(&mut self, timeout: Duration) -> bool {
        match self.worker.recv_timeout(timeout) {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Commit the outcome of a remote call.
    pub fn apply(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Directory(ids) => {
                tracing::info!(count = ids.len(), "Patient directory ready");
                self.directory = ids;
            }
            RemoteEvent::Health(Ok(health)) => {
                tracing::info!(status = %health.status, records = health.records, "Scoring service reachable");
                self.status = ServiceStatus::Online(health);
            }
            RemoteEvent::Health(Err(e)) => {
                tracing::warn!("Scoring service health probe failed: {}", e);
                self.status = ServiceStatus::Unreachable(e.to_string());
            }
            RemoteEvent::PatientLoaded { seq, id, result } => self.apply_load(seq, id, result),
            RemoteEvent::Scored(result) => self.apply_score(result),
        }
    }

    fn apply_load(&mut self, seq: u64, id: PatientId, result: Result<Panel, ClientError>) {
        if seq != self.load_seq {
            tracing::debug!(seq, latest = self.load_seq, "Discarding superseded patient load");
            return;
        }

        match result {
            Ok(panel) => {
                tracing::info!("Loaded patient {}", id);
                self.panel.replace(panel);
                // Scores for the previous panel must not be shown against this one.
                self.result = RiskResult::default();
                self.scored_at = None;
                self.loaded = Some(id);
            }
            Err(ClientError::PatientNotFound(missing)) => {
                tracing::warn!("Patient {} not found", missing);
                self.notice = Some(Notice {
                    kind: NoticeKind::PatientNotFound,
                    message: format!("Patient {missing} was not found by the scoring service."),
                });
            }
            Err(e) => {
                tracing::warn!("Loading patient {} failed: {}", id, e);
                self.notice = Some(Notice {
                    kind: NoticeKind::LoadFailed,
                    message: format!("Could not load patient {id}: {e}"),
                });
            }
        }
    }

    /// Scoring replies are not sequence-tagged: a reply is applied even if a
    /// patient load settled while it was outstanding.
    fn apply_score(&mut self, result: Result<RiskResult, ClientError>) {
        self.phase = Phase::Idle;
        match result {
            Ok(result) => {
                tracing::info!(
                    factors = result.top_factors.len(),
                    recommendations = result.recommendations.len(),
                    "Received risk scores"
                );
                self.result = result;
                self.scored_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::warn!("Scoring request failed: {}", e);
                self.notice = Some(Notice {
                    kind: NoticeKind::PredictFailed,
                    message: format!("The scoring service request failed: {e}"),
                });
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Derived view of the current panel and result.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.panel, &self.result)
    }

    #[must_use]
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    #[must_use]
    pub fn result(&self) -> &RiskResult {
        &self.result
    }

    #[must_use]
    pub fn scored_at(&self) -> Option<DateTime<Utc>> {
        self.scored_at
    }

    #[must_use]
    pub fn directory(&self) -> &[PatientId] {
        &self.directory
    }

    #[must_use]
    pub fn selected(&self) -> Option<&PatientId> {
        self.selected.as_ref()
    }

    /// Patient whose panel is currently shown, if any was loaded.
    #[must_use]
    pub fn loaded_patient(&self) -> Option<&PatientId> {
        self.loaded.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> &ServiceStatus {
        &self.status
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskCategory, TopFactor};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    const SETTLE: Duration = Duration::from_secs(5);

    /// In-memory scoring service.
    struct FakeService {
        directory: Vec<PatientId>,
        patients: HashMap<PatientId, Panel>,
        scoring: Mutex<VecDeque<Result<RiskResult, ClientError>>>,
        healthy: bool,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                directory: Vec::new(),
                patients: HashMap::new(),
                scoring: Mutex::new(VecDeque::new()),
                healthy: true,
            }
        }

        fn with_patient(mut self, id: &str, panel: Panel) -> Self {
            self.directory.push(PatientId::new(id));
            self.patients.insert(PatientId::new(id), panel);
            self
        }

        fn with_score(self, result: Result<RiskResult, ClientError>) -> Self {
            self.scoring.lock().expect("lock").push_back(result);
            self
        }
    }

    impl ScoringService for FakeService {
        fn list_patients(&self) -> Vec<PatientId> {
            self.directory.clone()
        }

        fn fetch_patient(&self, id: &PatientId) -> Result<Panel, ClientError> {
            self.patients
                .get(id)
                .copied()
                .ok_or_else(|| ClientError::PatientNotFound(id.clone()))
        }

        fn submit_for_scoring(&self, _panel: &Panel) -> Result<RiskResult, ClientError> {
            self.scoring
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("connection refused".into())))
        }

        fn health(&self) -> Result<ServiceHealth, ClientError> {
            if self.healthy {
                Ok(ServiceHealth {
                    status: "ok".into(),
                    records: self.directory.len() as u64,
                })
            } else {
                Err(ClientError::Transport("connection refused".into()))
            }
        }
    }

    fn patient_42() -> Panel {
        Panel::try_from_entries([
            (AnalyteCode::Hgb, 150.0),
            (AnalyteCode::Mcv, 88.0),
            (AnalyteCode::Glu, 5.0),
            (AnalyteCode::Alt, 20.0),
            (AnalyteCode::Ast, 22.0),
            (AnalyteCode::Crea, 80.0),
            (AnalyteCode::Tsh, 1.5),
        ])
        .expect("complete")
    }

    fn patient_7() -> Panel {
        let mut panel = patient_42();
        panel.set_value(AnalyteCode::Glu, "11.2");
        panel
    }

    fn scored() -> RiskResult {
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

    fn settle<S: ScoringService + 'static>(controller: &mut LabController<S>, events: usize) {
        for _ in 0..events {
            assert!(controller.wait_event(SETTLE), "remote call did not settle");
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = LabController::new(Arc::new(FakeService::new()));
        assert_eq!(*controller.panel(), Panel::default());
        assert!(controller.result().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.notice().is_none());
        assert_eq!(*controller.status(), ServiceStatus::Unknown);
    }

    #[test]
    fn test_start_fills_directory_and_status() {
        let service = FakeService::new()
            .with_patient("42", patient_42())
            .with_patient("7", patient_7());
        let mut controller = LabController::new(Arc::new(service));
        controller.start();
        settle(&mut controller, 2);

        assert_eq!(controller.directory(), &[PatientId::new("42"), PatientId::new("7")]);
        match controller.status() {
            ServiceStatus::Online(health) => assert_eq!(health.records, 2),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_directory_leaves_session_usable() {
        let mut service = FakeService::new();
        service.healthy = false;
        let mut controller = LabController::new(Arc::new(service));
        controller.start();
        settle(&mut controller, 2);

        assert!(controller.directory().is_empty());
        assert!(controller.notice().is_none());
        assert!(matches!(controller.status(), ServiceStatus::Unreachable(_)));

        // Still interactive.
        controller.select_next();
        assert!(controller.selected().is_none());
        assert!(!controller.load_patient());
        assert!(controller.edit_value(AnalyteCode::Alt, "51"));
        assert!((controller.panel().get(AnalyteCode::Alt) - 51.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_replaces_panel_and_resets_result() {
        let service = FakeService::new()
            .with_patient("42", patient_42())
            .with_score(Ok(scored()));
        let mut controller = LabController::new(Arc::new(service));

        assert!(controller.predict());
        settle(&mut controller, 1);
        assert!(!controller.result().is_empty());
        assert!(controller.scored_at().is_some());

        controller.select_patient(PatientId::new("42"));
        assert!(controller.load_patient());
        settle(&mut controller, 1);

        assert_eq!(*controller.panel(), patient_42());
        assert!(controller.result().scores.is_all_zero());
        assert!(controller.result().top_factors.is_empty());
        assert!(controller.result().recommendations.is_empty());
        assert!(controller.scored_at().is_none());
        assert_eq!(controller.loaded_patient(), Some(&PatientId::new("42")));
    }

    #[test]
    fn test_unknown_patient_raises_notice_and_keeps_panel() {
        let mut controller = LabController::new(Arc::new(FakeService::new()));
        controller.edit_value(AnalyteCode::Tsh, "6.1");
        let before = *controller.panel();

        controller.select_patient(PatientId::new("999"));
        controller.load_patient();
        settle(&mut controller, 1);

        assert_eq!(*controller.panel(), before);
        let notice = controller.notice().expect("notice");
        assert_eq!(notice.kind, NoticeKind::PatientNotFound);
        assert!(notice.message.contains("999"));

        controller.dismiss_notice();
        assert!(controller.notice().is_none());
    }

    #[test]
    fn test_load_transport_failure_raises_load_notice() {
        let mut controller = LabController::new(Arc::new(FakeService::new()));
        controller.select_patient(PatientId::new("5"));
        controller.load_patient();
        controller.apply(RemoteEvent::PatientLoaded {
            seq: controller.load_seq,
            id: PatientId::new("5"),
            result: Err(ClientError::Transport("timed out".into())),
        });

        assert_eq!(controller.notice().map(|n| n.kind), Some(NoticeKind::LoadFailed));
        assert_eq!(*controller.panel(), Panel::default());
    }

    #[test]
    fn test_load_without_selection_is_noop() {
        let mut controller = LabController::new(Arc::new(FakeService::new()));
        assert!(!controller.load_patient());
        assert!(!controller.wait_event(Duration::from_millis(50)));
        assert_eq!(controller.load_seq, 0);
    }

    #[test]
    fn test_predict_success_replaces_result() {
        let service = FakeService::new().with_score(Ok(scored()));
        let mut controller = LabController::new(Arc::new(service));

        assert!(controller.predict());
        assert!(controller.is_loading());
        settle(&mut controller, 1);

        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(*controller.result(), scored());
        let view = controller.view();
        let gauges: Vec<f64> = view.gauges.iter().map(|g| g.score).collect();
        assert_eq!(gauges, vec![70.0, 10.0, 5.0, 5.0, 20.0]);
        assert_eq!(view.radar.len(), 5);
        assert_eq!(view.factors, vec!["GLU: 40%"]);
        assert_eq!(view.recommendations.len(), 1);
    }

    #[test]
    fn test_predict_is_not_reentrant_while_loading() {
        let service = FakeService::new()
            .with_score(Ok(scored()))
            .with_score(Ok(RiskResult::default()));
        let mut controller = LabController::new(Arc::new(service));

        assert!(controller.predict());
        assert!(!controller.predict());
        assert!(!controller.predict());
        settle(&mut controller, 1);

        // Only one request was issued.
        assert!(!controller.wait_event(Duration::from_millis(50)));
        assert_eq!(*controller.result(), scored());
        assert!(controller.predict());
    }

    #[test]
    fn test_predict_failure_keeps_previous_result() {
        let service = FakeService::new()
            .with_score(Ok(scored()))
            .with_score(Err(ClientError::Transport("connection reset".into())));
        let mut controller = LabController::new(Arc::new(service));

        controller.predict();
        settle(&mut controller, 1);
        let scored_at = controller.scored_at();

        controller.predict();
        settle(&mut controller, 1);

        assert_eq!(*controller.result(), scored());
        assert_eq!(controller.scored_at(), scored_at);
        assert_eq!(controller.phase(), Phase::Idle);
        let notice = controller.notice().expect("notice");
        assert_eq!(notice.kind, NoticeKind::PredictFailed);
        assert_eq!(notice.title(), "Risk request failed");
    }

    #[test]
    fn test_edits_are_allowed_while_scoring() {
        let service = FakeService::new().with_score(Ok(scored()));
        let mut controller = LabController::new(Arc::new(service));

        controller.predict();
        assert!(controller.edit_value(AnalyteCode::Hgb, "118"));
        assert!(!controller.edit_value(AnalyteCode::Hgb, "abc"));
        settle(&mut controller, 1);

        assert!((controller.panel().get(AnalyteCode::Hgb) - 118.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_only_latest_load_is_applied() {
        let service = FakeService::new()
            .with_patient("42", patient_42())
            .with_patient("7", patient_7());
        let mut controller = LabController::new(Arc::new(service));

        controller.select_patient(PatientId::new("42"));
        controller.load_patient();
        controller.select_patient(PatientId::new("7"));
        controller.load_patient();
        settle(&mut controller, 2);

        assert_eq!(*controller.panel(), patient_7());
        assert_eq!(controller.loaded_patient(), Some(&PatientId::new("7")));
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut controller = LabController::new(Arc::new(FakeService::new()));
        controller.select_patient(PatientId::new("1"));
        controller.load_patient();
        controller.load_patient();

        controller.apply(RemoteEvent::PatientLoaded {
            seq: 1,
            id: PatientId::new("1"),
            result: Ok(patient_42()),
        });
        assert_eq!(*controller.panel(), Panel::default());

        controller.apply(RemoteEvent::PatientLoaded {
            seq: 2,
            id: PatientId::new("1"),
            result: Ok(patient_7()),
        });
        assert_eq!(*controller.panel(), patient_7());
    }

    #[test]
    fn test_score_settling_after_load_is_still_applied() {
        // Only loads are sequence-guarded; a reply to an earlier Predict
        // lands on whatever panel is showing when it settles.
        let mut controller = LabController::new(Arc::new(FakeService::new()));
        assert!(controller.predict());
        controller.select_patient(PatientId::new("7"));
        assert!(controller.load_patient());

        controller.apply(RemoteEvent::PatientLoaded {
            seq: 1,
            id: PatientId::new("7"),
            result: Ok(patient_7()),
        });
        assert!(controller.result().is_empty());
        assert_eq!(controller.phase(), Phase::Loading);

        controller.apply(RemoteEvent::Scored(Ok(scored())));
        assert_eq!(*controller.panel(), patient_7());
        assert_eq!(controller.loaded_patient(), Some(&PatientId::new("7")));
        assert_eq!(controller.result().scores.get(RiskCategory::Diabetes), 70.0);
        assert!(controller.scored_at().is_some());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_selection_cycles_through_directory() {
        let service = FakeService::new()
            .with_patient("1", patient_42())
            .with_patient("2", patient_42())
            .with_patient("3", patient_42());
        let mut controller = LabController::new(Arc::new(service));
        controller.start();
        settle(&mut controller, 2);

        controller.select_previous();
        assert_eq!(controller.selected(), Some(&PatientId::new("3")));
        controller.select_next();
        assert_eq!(controller.selected(), Some(&PatientId::new("1")));
        controller.select_next();
        assert_eq!(controller.selected(), Some(&PatientId::new("2")));
    }
}
