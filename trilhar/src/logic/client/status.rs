use crate::logic::client::broker::BrokerClient;
use crate::logic::types::{
    BreakKind, SessionStatus, StatusSnapshot, ATTR_BREAK_MINUTES, ATTR_CYCLES, ATTR_NEXT_BREAK,
    ATTR_REMAINING, ATTR_SESSIONS, ATTR_STATUS, DEFAULT_BREAK_MINUTES,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Reads the twin and turns it into a display-ready snapshot
#[derive(Clone)]
pub struct StatusReader {
    broker: BrokerClient,
}

impl StatusReader {
    pub fn new(broker: BrokerClient) -> Self {
        Self { broker }
    }

    /// Current snapshot of the device. Never fails: any broker problem
    /// yields [`StatusSnapshot::disconnected`].
    pub async fn get_status(&self) -> StatusSnapshot {
        match self.broker.fetch_entity().await {
            Ok(attributes) => snapshot_from_attributes(&attributes),
            Err(e) => {
                debug!(error = %e, url = self.broker.entity_url(), "twin read failed");
                StatusSnapshot::disconnected()
            }
        }
    }
}

/// `value` field of an attribute, if the attribute exists
fn attr_value<'a>(attributes: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    attributes.get(name).and_then(|attr| attr.get("value"))
}

/// Integer attribute; accepts JSON numbers and numeric strings
fn attr_i64(attributes: &Map<String, Value>, name: &str, default: i64) -> i64 {
    let parsed = match attr_value(attributes, name) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    };
    if parsed.is_none() && attributes.contains_key(name) {
        debug!(attribute = name, "malformed attribute, using default");
    }
    parsed.unwrap_or(default)
}

fn attr_str<'a>(attributes: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    attr_value(attributes, name)
        .and_then(Value::as_str)
        .unwrap_or(default)
}

/// Build a snapshot from the raw entity, defaulting each attribute on its own
pub fn snapshot_from_attributes(attributes: &Map<String, Value>) -> StatusSnapshot {
    let status = SessionStatus::from_raw(attr_str(attributes, ATTR_STATUS, "ocioso"));
    if let SessionStatus::Other(raw) = &status {
        debug!(status = %raw, "device reported an unknown session status");
    }

    StatusSnapshot {
        status,
        sessions: attr_i64(attributes, ATTR_SESSIONS, 0),
        cycles: attr_i64(attributes, ATTR_CYCLES, 0),
        remaining: format_remaining(attr_i64(attributes, ATTR_REMAINING, 0)),
        break_minutes: attr_i64(attributes, ATTR_BREAK_MINUTES, DEFAULT_BREAK_MINUTES),
        next_break: BreakKind::from_raw(attr_str(attributes, ATTR_NEXT_BREAK, "curta")),
    }
}

/// Format remaining seconds as `MM:SS`, or `H:MM:SS` from one hour up
pub fn format_remaining(seconds: i64) -> String {
    if seconds <= 0 {
        return "00:00".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    }
}
