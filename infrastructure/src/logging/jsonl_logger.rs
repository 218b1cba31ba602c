//! JSONL transcript writer for debate events.
//!
//! Every [`ConversationEvent`] becomes one JSON line carrying `type`,
//! `seq` and `timestamp` next to the event's own fields.

use chrono::{SecondsFormat, Utc};
use debate_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Transcript logger writing one JSON object per line.
///
/// Thread-safe via `Mutex`. Flushes after each event and on `Drop`.
pub struct JsonlConversationLogger {
    inner: Mutex<Inner>,
    path: PathBuf,
}

struct Inner {
    writer: BufWriter<File>,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the transcript at `path`, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        debug!("Writing debate transcript to {}", path.display());

        Ok(Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Create `<dir>/<debate_id>_<YYYYmmdd_HHMMSS>.jsonl`
    pub fn in_dir(dir: impl AsRef<Path>, debate_id: &str) -> io::Result<Self> {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        Self::create(dir.as_ref().join(format!("{}_{}.jsonl", debate_id, stamp)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events written so far
    pub fn events_written(&self) -> u64 {
        self.inner.lock().map(|inner| inner.seq).unwrap_or(0)
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert(
        "timestamp".to_string(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        let line = match serde_json::to_string(&record(event, inner.seq)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Dropping unserializable transcript event: {}", e);
                return;
            }
        };

        let written = writeln!(inner.writer, "{}", line).and_then(|_| inner.writer.flush());
        match written {
            Ok(()) => inner.seq += 1,
            Err(e) => warn!("Could not write to {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_events_are_merged_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new(
            "debate_started",
            json!({"topic": "What is 2 + 2?", "total_rounds": 2}),
        ));
        logger.log(ConversationEvent::new(
            "message",
            json!({"message": {"sender": "solo", "content": "4", "timestamp": "earlier"}}),
        ));
        assert_eq!(logger.events_written(), 2);
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "debate_started");
        assert_eq!(lines[0]["seq"], 0);
        assert_eq!(lines[0]["total_rounds"], 2);
        assert!(lines[0]["timestamp"].is_string());

        assert_eq!(lines[1]["type"], "message");
        assert_eq!(lines[1]["seq"], 1);
        assert_eq!(lines[1]["message"]["timestamp"], "earlier");
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new("verdict", json!("Answer: 4")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "verdict");
        assert_eq!(lines[0]["data"], "Answer: 4");
    }

    #[test]
    fn test_in_dir_creates_directory_and_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("transcripts").join("batch");
        let logger = JsonlConversationLogger::in_dir(&nested, "q7").unwrap();

        let name = logger.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("q7_"));
        assert!(name.ends_with(".jsonl"));
        assert!(nested.is_dir());
    }

    #[test]
    fn test_create_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        assert!(JsonlConversationLogger::create(blocker.join("debate.jsonl")).is_err());
    }
}
