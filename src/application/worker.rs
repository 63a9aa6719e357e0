//! Background request worker.
//!
//! Each remote call runs on its own short-lived thread and reports back over
//! an mpsc channel, so the UI loop never blocks on the network. The
//! controller drains the channel and is the only code that mutates state.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::{Panel, PatientId, RiskResult, ServiceHealth};
use crate::ports::{ClientError, ScoringService};

/// Outcome of one remote call.
#[derive(Debug)]
pub enum RemoteEvent {
    /// Patient directory (empty on failure).
    Directory(Vec<PatientId>),
    /// Health probe outcome.
    Health(Result<ServiceHealth, ClientError>),
    /// Patient fetch tagged with the sequence number it was issued under.
    PatientLoaded {
        seq: u64,
        id: PatientId,
        result: Result<Panel, ClientError>,
    },
    /// Scoring outcome.
    Scored(Result<RiskResult, ClientError>),
}

/// Spawns remote calls and collects their events.
pub struct RemoteWorker<S> {
    service: Arc<S>,
    tx: Sender<RemoteEvent>,
    rx: Receiver<RemoteEvent>,
}

impl<S> RemoteWorker<S>
where
    S: ScoringService + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { service, tx, rx }
    }

    pub fn list_patients(&self) {
        self.spawn(|service| RemoteEvent::Directory(service.list_patients()));
    }

    pub fn health(&self) {
        self.spawn(|service| RemoteEvent::Health(service.health()));
    }

    pub fn fetch_patient(&self, seq: u64, id: PatientId) {
        self.spawn(move |service| {
            let result = service.fetch_patient(&id);
            RemoteEvent::PatientLoaded { seq, id, result }
        });
    }

    pub fn submit_for_scoring(&self, panel: Panel) {
        self.spawn(move |service| RemoteEvent::Scored(service.submit_for_scoring(&panel)));
    }

    /// Next pending event, if any (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<RemoteEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RemoteEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn spawn<F>(&self, call: F)
    where
        F: FnOnce(&S) -> RemoteEvent + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            // The receiver only disappears when the session is shutting down.
            let _ = tx.send(call(service.as_ref()));
        });
    }
}
