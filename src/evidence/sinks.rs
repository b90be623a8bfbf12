//! Evidence sink implementations.

use super::{Evidence, EvidenceSink, Reporter};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{
    ambient_authority,
    fs_utf8::{Dir, File, OpenOptions},
};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Sink that emits evidence as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EvidenceSink for TracingSink {
    fn record(&self, title: &str, content: &str) {
        tracing::info!(target: "petstore_bdd::evidence", title, content, "evidence");
    }

    fn compare(&self, label: &str, expected: &str, actual: &str) {
        tracing::info!(
            target: "petstore_bdd::evidence",
            label,
            expected,
            actual,
            "comparison"
        );
    }
}

/// Append-only in-memory evidence log.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Evidence>>,
}

impl MemorySink {
    /// Snapshot of every entry recorded so far, in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<Evidence> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` when any entry carries `heading` as its title or label.
    #[must_use]
    pub fn contains_heading(&self, heading: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|entry| entry.heading() == heading)
    }

    fn push(&self, entry: Evidence) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl EvidenceSink for MemorySink {
    fn record(&self, title: &str, content: &str) {
        self.push(Evidence::Note {
            title: title.to_owned(),
            content: content.to_owned(),
        });
    }

    fn compare(&self, label: &str, expected: &str, actual: &str) {
        self.push(Evidence::Comparison {
            label: label.to_owned(),
            expected: expected.to_owned(),
            actual: actual.to_owned(),
        });
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    evidence: &'a Evidence,
}

/// Sink appending one JSON object per entry to a log file.
///
/// Each entry is written with a single `write_all` while holding the file
/// lock, so concurrent scenarios never interleave partial lines.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: Utf8PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory cannot be opened or the
    /// file cannot be created.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("evidence log path '{path}' has no file name"),
            )
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        let file = dir.open_with(name, &options)?;
        Ok(Self {
            path: path.to_owned(),
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn append(&self, evidence: &Evidence) {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let line = match serde_json::to_string(&JsonLine {
            timestamp,
            evidence,
        }) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(err) => {
                tracing::warn!(path = %self.path, %err, "failed to serialise evidence");
                return;
            }
        };
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = file.write_all(line.as_bytes()) {
            tracing::warn!(path = %self.path, %err, "failed to append evidence");
        }
    }
}

impl EvidenceSink for JsonLinesSink {
    fn record(&self, title: &str, content: &str) {
        self.append(&Evidence::Note {
            title: title.to_owned(),
            content: content.to_owned(),
        });
    }

    fn compare(&self, label: &str, expected: &str, actual: &str) {
        self.append(&Evidence::Comparison {
            label: label.to_owned(),
            expected: expected.to_owned(),
            actual: actual.to_owned(),
        });
    }
}

/// Sink forwarding every entry to each of its members in order.
#[derive(Default, Clone)]
pub struct TeeSink {
    sinks: Vec<Reporter>,
}

impl TeeSink {
    /// Create a tee over `sinks`.
    #[must_use]
    pub const fn new(sinks: Vec<Reporter>) -> Self {
        Self { sinks }
    }

    /// Add another destination.
    #[must_use]
    pub fn with(mut self, sink: Reporter) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EvidenceSink for TeeSink {
    fn record(&self, title: &str, content: &str) {
        for sink in &self.sinks {
            sink.record(title, content);
        }
    }

    fn compare(&self, label: &str, expected: &str, actual: &str) {
        for sink in &self.sinks {
            sink.compare(label, expected, actual);
        }
    }
}
