//! Wire types for the prediction and contact endpoints.
//!
//! Outbound payloads are only constructed through validating constructors
//! and inbound bodies are checked before they reach the rest of the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;

pub const FEATURE_NAMES: [&str; 22] = [
    "mdvp_fo",
    "mdvp_fhi",
    "mdvp_flo",
    "mdvp_jitter",
    "mdvp_jitter_abs",
    "mdvp_rap",
    "mdvp_ppq",
    "jitter_ddp",
    "mdvp_shimmer",
    "mdvp_shimmer_db",
    "shimmer_apq3",
    "shimmer_apq5",
    "mdvp_apq",
    "shimmer_dda",
    "nhr",
    "hnr",
    "rpde",
    "dfa",
    "spread1",
    "spread2",
    "d2",
    "ppe",
];

/// Acoustic voice measurements. Unset fields are sent as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoiceFeatures {
    pub mdvp_fo: f64,
    pub mdvp_fhi: f64,
    pub mdvp_flo: f64,
    pub mdvp_jitter: f64,
    pub mdvp_jitter_abs: f64,
    pub mdvp_rap: f64,
    pub mdvp_ppq: f64,
    pub jitter_ddp: f64,
    pub mdvp_shimmer: f64,
    pub mdvp_shimmer_db: f64,
    pub shimmer_apq3: f64,
    pub shimmer_apq5: f64,
    pub mdvp_apq: f64,
    pub shimmer_dda: f64,
    pub nhr: f64,
    pub hnr: f64,
    pub rpde: f64,
    pub dfa: f64,
    pub spread1: f64,
    pub spread2: f64,
    pub d2: f64,
    pub ppe: f64,
}

impl VoiceFeatures {
    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "mdvp_fo" => &mut self.mdvp_fo,
            "mdvp_fhi" => &mut self.mdvp_fhi,
            "mdvp_flo" => &mut self.mdvp_flo,
            "mdvp_jitter" => &mut self.mdvp_jitter,
            "mdvp_jitter_abs" => &mut self.mdvp_jitter_abs,
            "mdvp_rap" => &mut self.mdvp_rap,
            "mdvp_ppq" => &mut self.mdvp_ppq,
            "jitter_ddp" => &mut self.jitter_ddp,
            "mdvp_shimmer" => &mut self.mdvp_shimmer,
            "mdvp_shimmer_db" => &mut self.mdvp_shimmer_db,
            "shimmer_apq3" => &mut self.shimmer_apq3,
            "shimmer_apq5" => &mut self.shimmer_apq5,
            "mdvp_apq" => &mut self.mdvp_apq,
            "shimmer_dda" => &mut self.shimmer_dda,
            "nhr" => &mut self.nhr,
            "hnr" => &mut self.hnr,
            "rpde" => &mut self.rpde,
            "dfa" => &mut self.dfa,
            "spread1" => &mut self.spread1,
            "spread2" => &mut self.spread2,
            "d2" => &mut self.d2,
            "ppe" => &mut self.ppe,
            _ => return None,
        };
        Some(slot)
    }

    /// Set a feature by its wire name. The leading number of `raw` is used
    /// ("12.5abc" is 12.5); input with no leading number becomes 0, as an
    /// empty form field would.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ApiError> {
        let value = leading_float(raw).filter(|v| v.is_finite()).unwrap_or(0.0);
        let slot = self
            .slot(name)
            .ok_or_else(|| ApiError::Validation(format!("unknown feature: {}", name)))?;
        *slot = value;
        Ok(())
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn values(&self) -> [f64; 22] {
        [
            self.mdvp_fo,
            self.mdvp_fhi,
            self.mdvp_flo,
            self.mdvp_jitter,
            self.mdvp_jitter_abs,
            self.mdvp_rap,
            self.mdvp_ppq,
            self.jitter_ddp,
            self.mdvp_shimmer,
            self.mdvp_shimmer_db,
            self.shimmer_apq3,
            self.shimmer_apq5,
            self.mdvp_apq,
            self.shimmer_dda,
            self.nhr,
            self.hnr,
            self.rpde,
            self.dfa,
            self.spread1,
            self.spread2,
            self.d2,
            self.ppe,
        ]
    }

    pub fn non_zero_count(&self) -> usize {
        self.values().iter().filter(|v| **v != 0.0).count()
    }
}

/// Longest prefix of `raw` (after leading whitespace) that reads as a
/// decimal number with optional sign, fraction and exponent.
fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start().as_bytes();
    let digits = |from: usize| s[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(s.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if s.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(s.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(s.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    std::str::from_utf8(&s[..end]).ok()?.parse().ok()
}

/// Raw symptom form as collected from the user.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub symptom_text: String,
    pub severity: String,
    pub common_symptoms: Vec<String>,
    pub features: VoiceFeatures,
}

impl IntakeForm {
    pub fn validate(&self) -> Result<PredictRequest, ApiError> {
        let symptom_text = self.symptom_text.trim();
        if symptom_text.is_empty() {
            return Err(ApiError::Validation("Please enter symptoms".to_string()));
        }
        let severity = self.severity.trim();
        if severity.is_empty() {
            return Err(ApiError::Validation("Please select severity".to_string()));
        }
        Ok(PredictRequest {
            symptom_text: symptom_text.to_lowercase(),
            severity: severity.to_string(),
            common_symptoms: self.common_symptoms.clone(),
            features: self.features.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    #[serde(rename = "symptomText")]
    pub symptom_text: String,
    pub severity: String,
    #[serde(rename = "commonSymptoms")]
    pub common_symptoms: Vec<String>,
    #[serde(flatten)]
    pub features: VoiceFeatures,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Negative,
    Positive,
}

impl Outcome {
    pub fn as_int(&self) -> i64 {
        match self {
            Outcome::Negative => 0,
            Outcome::Positive => 1,
        }
    }
}

/// A prediction that passed response validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub outcome: Outcome,
    /// In [0, 1].
    pub probability: f64,
}

impl Prediction {
    pub fn probability_percent(&self) -> i64 {
        (self.probability * 100.0).round() as i64
    }
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    prediction: Option<Value>,
    #[serde(default)]
    probability: Option<Value>,
}

pub fn parse_prediction(body: &str) -> Result<Prediction, ApiError> {
    let raw: RawPrediction =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(format!("prediction body: {}", e)))?;

    let outcome = match raw.prediction.as_ref().and_then(Value::as_f64) {
        Some(v) if v == 0.0 => Outcome::Negative,
        Some(v) if v == 1.0 => Outcome::Positive,
        _ => {
            return Err(ApiError::Malformed(format!(
                "prediction must be 0 or 1, got {}",
                raw.prediction.unwrap_or(Value::Null)
            )))
        }
    };

    let probability = match raw.probability {
        None | Some(Value::Null) => 0.0,
        Some(v) => match v.as_f64() {
            Some(p) if (0.0..=1.0).contains(&p) => p,
            _ => return Err(ApiError::Malformed(format!("probability must be in [0, 1], got {}", v))),
        },
    };

    Ok(Prediction { outcome, probability })
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Message carried by a non-2xx body. A JSON object yields its `error`,
/// then `message`, then `fallback`; a body that is not a JSON error object
/// yields `unparsed`.
pub fn error_message(body: &str, unparsed: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => unparsed.to_string(),
    }
}

// =============================================================================
// Contact
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    name: String,
    email: String,
    message: String,
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, message: &str) -> Result<Self, ApiError> {
        let (name, email, message) = (name.trim(), email.trim(), message.trim());
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ApiError::Validation("Please fill in all fields before submitting.".to_string()));
        }
        Ok(Self { name: name.to_string(), email: email.to_string(), message: message.to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
