//! JSONL audit trail for workflow events.
//!
//! Each [`WorkflowEvent`] becomes one JSON line carrying `type`,
//! `submission_id` and an RFC 3339 `timestamp` next to the payload fields.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use verdict_application::EventPublisher;
use verdict_domain::WorkflowEvent;

/// Append-only JSONL writer implementing [`EventPublisher`].
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlAuditLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLog {
    /// Open (or create) the audit file, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: WorkflowEvent) -> Value {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(event.timestamp as i64)
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.kind.to_string()));
        map.insert(
            "submission_id".to_string(),
            event.submission_id.map_or(Value::Null, Value::String),
        );
        map.insert("timestamp".to_string(), Value::String(timestamp));
        Value::Object(map)
    }
}

impl EventPublisher for JsonlAuditLog {
    fn publish(&self, event: WorkflowEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAuditLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verdict_domain::EventKind;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_audit_log_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("events.jsonl");
        let log = JsonlAuditLog::new(&path).unwrap();

        log.publish(WorkflowEvent::new(
            EventKind::WorkflowStarted,
            Some("sub-1"),
            json!({ "workflow": "compliance-audit-workflow", "agents": 3 }),
        ));
        log.publish(WorkflowEvent::new(
            EventKind::AgentSkipped,
            Some("sub-1"),
            json!({ "agent": "pattern-recognition", "reason": "agent not registered" }),
        ));
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "workflow-started");
        assert_eq!(lines[0]["submission_id"], "sub-1");
        assert_eq!(lines[0]["workflow"], "compliance-audit-workflow");
        assert_eq!(lines[0]["agents"], 3);
        assert_eq!(lines[1]["type"], "agent-skipped");
        assert_eq!(lines[1]["reason"], "agent not registered");

        let ts = lines[0]["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_audit_log_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        for id in ["a", "b"] {
            let log = JsonlAuditLog::new(&path).unwrap();
            log.publish(WorkflowEvent::workflow_failed(Some(id), "boom"));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["submission_id"], "b");
        assert_eq!(lines[1]["status"], "failed");
    }

    #[test]
    fn test_audit_log_wraps_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = JsonlAuditLog::new(&path).unwrap();

        log.publish(WorkflowEvent::new(
            EventKind::HumanReviewRequested,
            None,
            json!("manual check"),
        ));
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "manual check");
        assert!(lines[0]["submission_id"].is_null());
    }
}
