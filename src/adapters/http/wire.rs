//! Wire decoding for scoring-service responses.
//!
//! Every response body passes through one of these functions before it
//! reaches the domain. Missing optional fields map to their documented
//! defaults; anything else that does not fit is a [`ClientError::Decode`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{AnalyteCode, Panel, PatientId, RiskCategory, RiskResult, RiskScores, TopFactor};
use crate::ports::ClientError;

/// Decode `GET /patients`: a JSON array of integer or string identifiers.
///
/// # Errors
/// Returns [`ClientError::Decode`] if the body is not an array of scalars.
pub fn decode_directory(body: &[u8]) -> Result<Vec<PatientId>, ClientError> {
    let items: Vec<Value> = serde_json::from_slice(body).map_err(decode_err)?;
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(PatientId::new(s)),
            Value::Number(n) => Ok(PatientId::new(n.to_string())),
            other => Err(ClientError::Decode(format!(
                "patient identifier must be a number or string, got {other}"
            ))),
        })
        .collect()
}

/// Decode `GET /patient/{id}`.
///
/// An object carrying `error` (or `detail`, as emitted by the service on 404)
/// means the patient does not exist. Otherwise all seven analyte fields must
/// be present as numbers or numeric strings; extra columns are ignored.
///
/// # Errors
/// [`ClientError::PatientNotFound`] for error payloads, [`ClientError::Decode`]
/// for anything that does not yield a complete panel.
pub fn decode_patient(id: &PatientId, body: &[u8]) -> Result<Panel, ClientError> {
    let value: Value = serde_json::from_slice(body).map_err(decode_err)?;
    let object = match value {
        Value::Object(object) => object,
        Value::Null => return Err(ClientError::PatientNotFound(id.clone())),
        other => {
            return Err(ClientError::Decode(format!(
                "patient record must be an object, got {other}"
            )))
        }
    };

    if is_error_payload(&object) {
        return Err(ClientError::PatientNotFound(id.clone()));
    }

    let mut entries = Vec::with_capacity(AnalyteCode::ALL.len());
    for code in AnalyteCode::ALL {
        if let Some(raw) = object.get(code.as_str()) {
            entries.push((code, coerce_number(code, raw)?));
        }
    }

    Panel::try_from_entries(entries).map_err(|e| ClientError::Decode(e.to_string()))
}

/// `error`/`detail` only count when set to something truthy: `null`,
/// `false`, `0` and `""` are treated as absent.
fn is_error_payload(object: &Map<String, Value>) -> bool {
    ["error", "detail"]
        .iter()
        .any(|key| object.get(*key).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_number(code: AnalyteCode, raw: &Value) -> Result<f64, ClientError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ClientError::Decode(format!("{code} is not numeric: {raw}")))
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    scores: Option<Map<String, Value>>,
    #[serde(default, rename = "topFactors")]
    top_factors: Option<Vec<FactorWire>>,
    #[serde(default)]
    recommendations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct FactorWire {
    key: String,
    weight: f64,
}

/// Decode `POST /predict`.
///
/// Absent or `null` `scores`, `topFactors` and `recommendations` become the
/// empty mapping/sequence. Unknown categories and factors naming an unknown
/// analyte are dropped.
///
/// # Errors
/// Returns [`ClientError::Decode`] if the body is not an object of that shape
/// or a known category carries a non-numeric score.
pub fn decode_risk_result(body: &[u8]) -> Result<RiskResult, ClientError> {
    let response: PredictResponse = serde_json::from_slice(body).map_err(decode_err)?;

    let mut scores = RiskScores::default();
    for (name, raw) in response.scores.unwrap_or_default() {
        let Ok(category) = name.parse::<RiskCategory>() else {
            tracing::debug!(category = %name, "ignoring unknown risk category");
            continue;
        };
        let score = raw
            .as_f64()
            .ok_or_else(|| ClientError::Decode(format!("score for {category} is not numeric")))?;
        scores.set(category, score);
    }

    let top_factors = response
        .top_factors
        .unwrap_or_default()
        .into_iter()
        .filter_map(|factor| match factor.key.parse::<AnalyteCode>() {
            Ok(key) => Some(TopFactor {
                key,
                weight: factor.weight,
            }),
            Err(_) => {
                tracing::debug!(key = %factor.key, "ignoring factor for unknown analyte");
                None
            }
        })
        .collect();

    Ok(RiskResult {
        scores,
        top_factors,
        recommendations: response.recommendations.unwrap_or_default(),
    })
}

fn decode_err(e: serde_json::Error) -> ClientError {
    ClientError::Decode(e.to_string())
}
