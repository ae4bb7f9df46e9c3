//! End-to-end flows over the public API with in-process fakes for the
//! backend and both store implementations.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use symptom_intake::aggregate::{chart_series, summarize, Summary};
use symptom_intake::api::types::{ContactMessage, IntakeForm, Outcome, PredictRequest, Prediction};
use symptom_intake::api::{ApiError, ContactService, PredictionService};
use symptom_intake::dashboard::CapturingSink;
use symptom_intake::history::{HistoryStore, MAX_ENTRIES};
use symptom_intake::intake::{submit_contact, submit_intake};
use symptom_intake::recorder::Recorder;
use symptom_intake::storage::{KvStore, MemoryStore, SqliteStore};

enum Reply {
    Ok(Prediction),
    Backend(u16, &'static str),
    Malformed,
}

struct FakeBackend {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<PredictRequest>>,
}

impl FakeBackend {
    fn new(reply: Reply) -> Self {
        Self { reply, calls: AtomicUsize::new(0), last_request: Mutex::new(None) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionService for FakeBackend {
    async fn predict(&self, request: &PredictRequest) -> Result<Prediction, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Ok(p) => Ok(*p),
            Reply::Backend(status, message) => Err(ApiError::Backend { status: *status, message: message.to_string() }),
            Reply::Malformed => Err(ApiError::Malformed("prediction must be 0 or 1, got 3".to_string())),
        }
    }
}

#[async_trait]
impl ContactService for FakeBackend {
    async fn send(&self, message: &ContactMessage) -> Result<Value, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Ok(_) => Ok(json!({ "status": "ok", "to": message.email() })),
            Reply::Backend(status, text) => Err(ApiError::Backend { status: *status, message: text.to_string() }),
            Reply::Malformed => Err(ApiError::Malformed("contact body".to_string())),
        }
    }
}

fn clock() -> impl Fn() -> String {
    let n = Cell::new(0u32);
    move || {
        n.set(n.get() + 1);
        format!("8/{}/2026, 10:30:00 AM", n.get() % 28 + 1)
    }
}

fn form(text: &str, severity: &str) -> IntakeForm {
    IntakeForm { symptom_text: text.to_string(), severity: severity.to_string(), ..Default::default() }
}

fn positive(probability: f64) -> Reply {
    Reply::Ok(Prediction { outcome: Outcome::Positive, probability })
}

#[tokio::test]
async fn successful_intake_is_recorded_first() {
    let backend = FakeBackend::new(positive(0.857));
    let mut recorder = Recorder::new(MemoryStore::new(), clock(), CapturingSink::default());

    let result = submit_intake(&backend, &mut recorder, &form("Tremor and Rigidity", "moderate")).await.unwrap();

    assert_eq!(result.entry.prediction, 1);
    assert_eq!(result.entry.probability_percent, 86);
    assert_eq!(result.entry.severity, "moderate");
    assert_eq!(recorder.load().first(), Some(&result.entry));

    let sent = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent.symptom_text, "tremor and rigidity");

    let view = recorder.sink().last().unwrap();
    assert_eq!(view.summary, Summary { total: 1, positive: 1, negative: 0 });
}

#[tokio::test]
async fn validation_failure_skips_backend_and_history() {
    let backend = FakeBackend::new(positive(0.9));
    let mut recorder = Recorder::new(MemoryStore::new(), clock(), CapturingSink::default());

    let err = submit_intake(&backend, &mut recorder, &form("  ", "mild")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    let err = submit_intake(&backend, &mut recorder, &form("tremor", "")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(backend.calls(), 0);
    assert!(recorder.load().is_empty());
    assert_eq!(recorder.sink().renders(), 0);
}

#[tokio::test]
async fn backend_failure_leaves_history_unchanged() {
    let mut recorder = Recorder::new(MemoryStore::new(), clock(), CapturingSink::default());
    let ok = FakeBackend::new(positive(0.7));
    submit_intake(&ok, &mut recorder, &form("tremor", "mild")).await.unwrap();
    let before = recorder.load();

    let failing = FakeBackend::new(Reply::Backend(400, "Invalid numeric feature values"));
    let err = submit_intake(&failing, &mut recorder, &form("tremor", "mild")).await.unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 400, .. }));
    assert_eq!(err.to_string(), "backend returned 400: Invalid numeric feature values");

    let malformed = FakeBackend::new(Reply::Malformed);
    let err = submit_intake(&malformed, &mut recorder, &form("tremor", "mild")).await.unwrap_err();
    assert!(matches!(err, ApiError::Malformed(_)));

    assert_eq!(recorder.load(), before);
}

#[tokio::test]
async fn contact_validation_and_delivery() {
    let backend = FakeBackend::new(positive(0.0));
    let err = submit_contact(&backend, "Ana", "", "hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(backend.calls(), 0);

    let ack = submit_contact(&backend, " Ana ", "ana@example.com", "hello").await.unwrap();
    assert_eq!(ack["to"], "ana@example.com");
    assert_eq!(backend.calls(), 1);

    let failing = FakeBackend::new(Reply::Backend(500, "Failed to send message."));
    assert!(submit_contact(&failing, "Ana", "ana@example.com", "hello").await.is_err());
}

#[test]
fn cap_holds_across_many_records() {
    let mut recorder = Recorder::new(MemoryStore::new(), clock(), CapturingSink::default());
    for i in 0..105i64 {
        recorder.record(i % 2, i, "mild");
        let log = recorder.load();
        assert!(log.len() <= MAX_ENTRIES);
        assert_eq!(log.first().unwrap().probability_percent, i);
    }
    let log = recorder.load();
    assert_eq!(log.len(), 100);
    let probs: Vec<i64> = log.entries().iter().map(|e| e.probability_percent).collect();
    let expected: Vec<i64> = (5..105).rev().collect();
    assert_eq!(probs, expected);

    let s = summarize(&log);
    assert_eq!(s.positive + s.negative, s.total);
}

#[test]
fn sqlite_history_survives_reopen_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intake.sqlite");
    let path = path.to_str().unwrap();

    {
        let mut store = SqliteStore::new(path).unwrap();
        store.init().unwrap();
        let mut recorder = Recorder::new(store, clock(), CapturingSink::default());
        for (p, pct) in [(1, 91), (0, 4), (1, 77), (0, 12), (1, 66)] {
            recorder.record(p, pct, "severe");
        }
    }

    let mut store = SqliteStore::new(path).unwrap();
    store.init().unwrap();
    let history = HistoryStore::new(store);
    let log = history.load();
    let series = chart_series(&log, 20);
    assert_eq!(series.probabilities, vec![66, 12, 77, 4, 91]);
    assert_eq!(series.labels.len(), 5);
    assert_eq!((series.positive, series.negative), (3, 2));

    let mut recorder = Recorder::new(history.into_store(), clock(), CapturingSink::default());
    recorder.clear();
    assert!(recorder.load().is_empty());
    assert_eq!(summarize(&recorder.load()), Summary::default());
}

#[test]
fn corrupt_store_behaves_as_absent() {
    let mut store = MemoryStore::new();
    store.set("parkinsonResults", "[{\"date\": 5").unwrap();
    let mut recorder = Recorder::new(store, clock(), CapturingSink::default());
    assert!(recorder.load().is_empty());

    recorder.record(0, 3, "");
    let log = recorder.load();
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].severity, "unknown");
}
