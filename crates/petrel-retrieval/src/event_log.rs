//! Append-only JSONL sink for retrieval audit events.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use petrel_core::errors::PetrelResult;
use serde_json::Value;

/// File name of the retrieval audit log, relative to the log directory.
pub const TRAJECTORY_LOG: &str = "retrieval_trajectories.jsonl";

/// JSONL event sink. One JSON object per line, append-only, each line
/// stamped with a UTC timestamp.
///
/// Writes are best effort: a failed write drops the event rather than
/// failing the query that produced it.
pub struct EventLog {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLog {
    /// Open the log file in append mode, creating it and any parent
    /// directories as needed.
    pub fn open(path: &Path) -> PetrelResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(Mutex::new(BufWriter::new(file))),
        })
    }

    /// A sink that discards every event. Used where no log directory
    /// is wanted, e.g. in-memory test backends.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Append one event. Events without a `type` field are tagged
    /// `"type": "retrieval"` so mixed logs stay filterable.
    pub fn append(&self, mut event: Value) {
        if let Value::Object(fields) = &mut event {
            fields
                .entry("type")
                .or_insert_with(|| Value::String("retrieval".to_string()));
        }
        self.append_raw(event);
    }

    /// Append one record without the `type` tagging. Used for run and
    /// benchmark logs whose rows are their own schema. A `timestamp`
    /// field is added unless the record already carries one.
    pub fn append_raw(&self, mut record: Value) {
        let Some(writer) = &self.writer else {
            return;
        };
        if let Value::Object(fields) = &mut record {
            fields
                .entry("timestamp")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        }
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        // Logging must never take down the query path, so I/O errors
        // are swallowed here.
        if let Ok(mut handle) = writer.lock() {
            let _ = handle.write_all(line.as_bytes());
            let _ = handle.write_all(b"\n");
            let _ = handle.flush();
        }
    }
}
