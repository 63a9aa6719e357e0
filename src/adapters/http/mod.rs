//! HTTP adapter for the scoring service.
//!
//! Uses the blocking `reqwest` client: every call is issued from a worker
//! thread, never from the UI loop.

pub mod wire;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};

use crate::config::ClientConfig;
use crate::domain::{Panel, PatientId, RiskResult, ServiceHealth};
use crate::ports::{ClientError, ScoringService};
use crate::LabRiskError;

/// `ScoringService` backed by the JSON-over-HTTP API.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: Client,
    base: String,
    root: Url,
}

impl HttpScoringClient {
    /// Build a client for the configured base URL.
    ///
    /// # Errors
    /// Returns [`LabRiskError::Config`] if the base URL is not a valid
    /// absolute URL or the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> crate::Result<Self> {
        let root = Url::parse(&config.api_base)
            .map_err(|e| LabRiskError::Config(format!("invalid API base {:?}: {e}", config.api_base)))?;
        if root.cannot_be_a_base() {
            return Err(LabRiskError::Config(format!(
                "API base {:?} cannot carry a path",
                config.api_base
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| LabRiskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: config.api_base.clone(),
            root,
        })
    }

    /// Base URL requests are issued against (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `/patient/{id}` with the identifier escaped as a single path segment.
    fn patient_url(&self, id: &PatientId) -> Result<Url, ClientError> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Transport(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .push("patient")
            .push(id.as_str());
        Ok(url)
    }

    fn get(&self, url: impl reqwest::IntoUrl) -> Result<Response, ClientError> {
        self.client.get(url).send().map_err(transport_err)
    }
}

impl ScoringService for HttpScoringClient {
    fn list_patients(&self) -> Vec<PatientId> {
        let result = self
            .get(self.url("/patients"))
            .and_then(ensure_success)
            .and_then(read_body)
            .and_then(|body| wire::decode_directory(&body));

        match result {
            Ok(ids) => {
                tracing::info!(count = ids.len(), "Loaded patient directory");
                ids
            }
            Err(e) => {
                tracing::warn!("Patient directory unavailable, continuing with none: {}", e);
                Vec::new()
            }
        }
    }

    fn fetch_patient(&self, id: &PatientId) -> Result<Panel, ClientError> {
        let response = self.get(self.patient_url(id)?)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::PatientNotFound(id.clone()));
        }
        let body = read_body(ensure_success(response)?)?;
        wire::decode_patient(id, &body)
    }

    fn submit_for_scoring(&self, panel: &Panel) -> Result<RiskResult, ClientError> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(panel)
            .send()
            .map_err(transport_err)?;
        let body = read_body(ensure_success(response)?)?;
        wire::decode_risk_result(&body)
    }

    fn health(&self) -> Result<ServiceHealth, ClientError> {
        let body = read_body(ensure_success(self.get(self.url("/health"))?)?)?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Transport(format!(
            "{} responded with status {}",
            response.url().path(),
            status.as_u16()
        )))
    }
}

fn read_body(response: Response) -> Result<Vec<u8>, ClientError> {
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(transport_err)
}

fn transport_err(e: reqwest::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}
