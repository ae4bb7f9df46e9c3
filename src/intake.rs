//! Form submission flows: symptom intake and contact.
//!
//! Validation happens before any request. History is only touched after
//! the prediction call succeeds; every failure leaves it as it was.

use serde_json::{json, Value};

use crate::api::types::{ContactMessage, IntakeForm, Outcome, Prediction};
use crate::api::{ApiError, ContactService, PredictionService};
use crate::dashboard::DashboardSink;
use crate::history::{Clock, HistoryEntry};
use crate::logging::{self, obj, v_str, Domain};
use crate::recorder::Recorder;
use crate::storage::KvStore;

#[derive(Debug, Clone)]
pub struct IntakeResult {
    pub prediction: Prediction,
    pub entry: HistoryEntry,
}

pub async fn submit_intake<P, S, C, D>(
    service: &P,
    recorder: &mut Recorder<S, C, D>,
    form: &IntakeForm,
) -> Result<IntakeResult, ApiError>
where
    P: PredictionService + ?Sized,
    S: KvStore,
    C: Clock,
    D: DashboardSink,
{
    let request = form.validate()?;
    let prediction = match service.predict(&request).await {
        Ok(p) => p,
        Err(err) => {
            logging::error(Domain::Predict, "predict_failed", obj(&[("error", v_str(&err.to_string()))]));
            return Err(err);
        }
    };
    let entry = recorder.record(prediction.outcome.as_int(), prediction.probability_percent(), &request.severity);
    Ok(IntakeResult { prediction, entry })
}

pub async fn submit_contact<P>(service: &P, name: &str, email: &str, message: &str) -> Result<Value, ApiError>
where
    P: ContactService + ?Sized,
{
    let message = ContactMessage::new(name, email, message)?;
    match service.send(&message).await {
        Ok(ack) => {
            logging::info(Domain::Contact, "contact_sent", obj(&[("ack", json!(ack))]));
            Ok(ack)
        }
        Err(err) => {
            logging::error(Domain::Contact, "contact_failed", obj(&[("error", v_str(&err.to_string()))]));
            Err(err)
        }
    }
}

/// One-line verdict shown after a prediction.
pub fn describe(prediction: &Prediction) -> String {
    let pct = prediction.probability * 100.0;
    match prediction.outcome {
        Outcome::Positive => format!("Parkinson's suspected - Probability: {:.1}%", pct),
        Outcome::Negative => format!("No Parkinson's detected - Probability: {:.1}%", pct),
    }
}
