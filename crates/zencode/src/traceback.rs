//! Traceback & diagnostics (`spec.md` §4.6, C9).
//!
//! An append-only event log (`spec.md` §9: "Traceback as a ring/append
//! buffer. Replace string concatenation with a structured event log and
//! render on failure") accumulated while the executor runs, rendered on
//! failure and cleared.

use crate::context::Compartments;
use crate::schema::SchemaRegistry;
use serde_json::json;
use std::fmt::Write as _;

/// One traced event: either a plain trace line or the terminal failure.
#[derive(Debug, Clone)]
enum Event {
    Trace(String),
    Failure(String),
}

/// The accumulated trace for one run.
#[derive(Debug, Default)]
pub struct Traceback {
    events: Vec<Event>,
}

impl Traceback {
    /// An empty traceback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a source line as it begins executing.
    pub fn trace(&mut self, line: impl Into<String>) {
        self.events.push(Event::Trace(line.into()));
    }

    /// Records the terminal failure message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.events.push(Event::Failure(message.into()));
    }

    /// Renders the human-readable failure report: the accumulated trace,
    /// then ordered dumps of `IN`, `TMP`, `ACK`, `OUT`, and the schema
    /// registry, then clears the buffer (`spec.md` §4.6).
    pub fn render_failure(&mut self, cx: &Compartments, schemas: &SchemaRegistry) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                Event::Trace(line) => {
                    let _ = writeln!(out, "trace: {line}");
                }
                Event::Failure(message) => {
                    let _ = writeln!(out, "error: {message}");
                }
            }
        }
        let _ = writeln!(out, "IN: {}", cx.input.to_json());
        let _ = writeln!(out, "IN.KEYS: {}", cx.input_keys.to_json());
        let _ = writeln!(
            out,
            "TMP: data={:?} schema={:?} root={:?} valid={:?}",
            cx.tmp.data.as_ref().map(super::Value::to_json),
            cx.tmp.schema,
            cx.tmp.root,
            cx.tmp.valid.as_ref().map(super::Value::to_json),
        );
        let _ = writeln!(out, "ACK: {}", super::Value::Map(cx.ack.clone()).to_json());
        let _ = writeln!(out, "OUT: {}", super::Value::Map(cx.out.clone()).to_json());
        let _ = writeln!(out, "schemas: {:?}", schemas.names());
        self.events.clear();
        out
    }

    /// A machine-readable dump of the same information, for structured
    /// consumers (`spec.md` §4.6: "A separate JSON-formatted debug dump is
    /// also available for machine consumers.").
    #[must_use]
    pub fn debug_json(&self, cx: &Compartments, schemas: &SchemaRegistry) -> serde_json::Value {
        let trace: Vec<serde_json::Value> = self
            .events
            .iter()
            .map(|event| match event {
                Event::Trace(line) => json!({"kind": "trace", "line": line}),
                Event::Failure(message) => json!({"kind": "failure", "message": message}),
            })
            .collect();
        json!({
            "trace": trace,
            "in": cx.input.to_json(),
            "in_keys": cx.input_keys.to_json(),
            "tmp": {
                "data": cx.tmp.data.as_ref().map(super::Value::to_json),
                "schema": cx.tmp.schema,
                "root": cx.tmp.root,
                "valid": cx.tmp.valid.as_ref().map(super::Value::to_json),
            },
            "ack": super::Value::Map(cx.ack.clone()).to_json(),
            "out": super::Value::Map(cx.out.clone()).to_json(),
            "schemas": schemas.names(),
        })
    }
}
