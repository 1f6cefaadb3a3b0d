//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use metrics_exporter_prometheus::{PrometheusHandle, PrometheusRecorder};
use query_observer::observability::metrics::prometheus_builder;
use query_observer::Clock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One event seen by [`EventCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.level == level).collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// A subscriber enabled up to `max_level` that captures everything it lets through.
pub fn capturing_subscriber(
    max_level: LevelFilter,
) -> (EventCapture, impl Subscriber + Send + Sync + 'static) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry()
        .with(max_level)
        .with(capture.clone());
    (capture, subscriber)
}

/// A Prometheus recorder with the crate's bucket layout, not installed globally.
pub fn prometheus_recorder() -> (PrometheusRecorder, PrometheusHandle) {
    let recorder = prometheus_builder().unwrap().build_recorder();
    let handle = recorder.handle();
    (recorder, handle)
}

/// Whether the rendered exposition contains exactly this line.
#[allow(dead_code)]
pub fn has_line(rendered: &str, line: &str) -> bool {
    rendered.lines().any(|l| l == line)
}

/// Clock frozen at a single instant.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed reference instant used as "T" in the tests.
#[allow(dead_code)]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}
