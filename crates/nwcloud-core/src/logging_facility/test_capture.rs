//! In-memory event capture for tests
//!
//! Installs a global subscriber that keeps every event so tests can assert
//! on operation brackets and warnings without parsing log output.

use crate::schema::{FIELD_EVENT, FIELD_OP};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

struct FieldRecorder<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    sink: Sink,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        if let Ok(mut events) = self.sink.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }
    }
}

/// Handle onto the shared capture
#[derive(Clone)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events logged for one operation, in order
    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op))
            .collect()
    }

    /// Event names logged for one operation, e.g. `["start", "end"]`
    pub fn sequence(&self, op: &str) -> Vec<String> {
        self.events_for(op)
            .iter()
            .filter_map(|e| e.event().map(str::to_string))
            .collect()
    }

    /// # Panics
    ///
    /// If no event with this operation and event name was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.sequence(op);
        assert!(
            seen.iter().any(|e| e == event),
            "expected event op={} event={}, saw {:?}",
            op,
            event,
            seen
        );
    }

    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|e| e.level == Level::WARN && e.message().is_some_and(|m| m.contains(needle)))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber on first use and return its handle
///
/// All tests in one binary share the capture, so assert on operation names
/// unique to the test.
///
/// ```
/// use nwcloud_core::logging_facility::test_capture::init_test_capture;
/// use nwcloud_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example_op");
/// assert_eq!(capture.sequence("doc_example_op"), vec!["start"]);
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let sink = Sink::default();
            tracing_subscriber::registry()
                .with(CaptureLayer { sink: sink.clone() })
                .try_init()
                .ok();
            TestCapture { sink }
        })
        .clone()
}
