//! Tracing layer for JSONL output.
//!
//! One JSON object per line on stderr, keeping stdout clean for payloads.
//! Span fields `run_id`, `stage` and `key` are inherited by nested events.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

/// Correlation fields recorded on a span.
#[derive(Debug, Clone, Default)]
struct SpanContext {
    run_id: Option<String>,
    stage: Option<String>,
    key: Option<String>,
}

impl Visit for SpanContext {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }
}

impl SpanContext {
    fn record(&mut self, field: &Field, value: String) {
        match field.name() {
            "run_id" => self.run_id = Some(value),
            "stage" => self.stage = Some(value),
            "key" => self.key = Some(value),
            _ => {}
        }
    }

    /// Fill unset fields from an enclosing span.
    fn inherit(&mut self, outer: &SpanContext) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&outer.run_id);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&outer.stage);
        }
        if self.key.is_none() {
            self.key.clone_from(&outer.key);
        }
    }
}

/// Fields of one event, split into the named columns and the rest.
#[derive(Default)]
struct EventFields {
    event: Option<String>,
    message: Option<String>,
    extra: Map<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        self.extra.insert(field.name().to_owned(), value);
    }

    fn put_text(&mut self, field: &Field, text: String) {
        match field.name() {
            "event" => self.event = Some(text),
            "message" => self.message = Some(text),
            _ => self.put(field, Value::String(text)),
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put_text(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put_text(field, format!("{value:?}"));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.into());
    }

    // Non-finite floats have no JSON form and are dropped.
    fn record_f64(&mut self, field: &Field, value: f64) {
        if value.is_finite() {
            self.put(field, value.into());
        }
    }
}

/// Writes every event as one JSON object per line.
pub struct JsonlLayer<W = io::Stderr> {
    sink: Mutex<W>,
}

impl JsonlLayer {
    pub fn stderr() -> Self {
        Self::to_writer(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn to_writer(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    fn emit(&self, record: Map<String, Value>) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        // Logging must never abort a run, so write failures are dropped.
        let _ = writeln!(sink, "{}", Value::Object(record));
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut context = SpanContext::default();
        attrs.record(&mut context);
        span.extensions_mut().insert(context);
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut context = SpanContext::default();
        for span in ctx.event_scope(event).into_iter().flatten() {
            if let Some(outer) = span.extensions().get::<SpanContext>() {
                context.inherit(outer);
            }
        }

        let mut fields = EventFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        let name = fields.event.unwrap_or_else(|| meta.target().to_owned());
        let mut record = Map::new();
        record.insert("ts".into(), Utc::now().to_rfc3339().into());
        record.insert("level".into(), Level::from(*meta.level()).as_str().into());
        record.insert("event".into(), name.into());
        let columns = [
            ("run_id", context.run_id),
            ("stage", context.stage),
            ("key", context.key),
            ("message", fields.message),
        ];
        for (column, value) in columns {
            if let Some(value) = value {
                record.insert(column.into(), value.into());
            }
        }
        if !fields.extra.is_empty() {
            record.insert("fields".into(), Value::Object(fields.extra));
        }
        self.emit(record);
    }
}
