//! Bounded request log.
//!
//! Every request and response that passes through the pipeline is recorded
//! here with method, path, status, and a truncated payload summary. The
//! buffer is append-only and capped: once full, the oldest entry is evicted.
//! Credentials are redacted before an entry is ever stored.
//!
//! The log doubles as a `tracing` mirror: each recorded entry is also emitted
//! as a tracing event at the matching level.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Maximum number of entries kept in the buffer.
pub const MAX_ENTRIES: usize = 500;

/// Number of leading bearer-token characters preserved when redacting.
const TOKEN_PREFIX_LEN: usize = 20;

/// Number of payload characters preserved in request summaries.
const PAYLOAD_SUMMARY_LEN: usize = 100;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// A single recorded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Structured context, already redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Filter for [`RequestLog::filter`].
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Keep only entries at this level.
    pub level: Option<LogLevel>,
    /// Keep only entries whose message contains this substring.
    pub message_contains: Option<String>,
    /// Keep only entries at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

/// Append-only bounded request log.
///
/// Cheap to clone; all clones share one buffer.
#[derive(Clone)]
pub struct RequestLog {
    inner: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_ENTRIES))),
        }
    }

    /// Create a log pre-populated from a previously saved file.
    ///
    /// A missing or unreadable file yields an empty log, the same as a first
    /// run.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let log = Self::new();
        if let Ok(bytes) = fs::read(path)
            && let Ok(entries) = serde_json::from_slice::<Vec<LogEntry>>(&bytes)
            && let Ok(mut guard) = log.inner.lock()
        {
            for entry in entries.into_iter().take(MAX_ENTRIES) {
                guard.push_back(entry);
            }
        }
        log
    }

    /// Persist the current entries to a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let entries = self.entries();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(&entries).map_err(std::io::Error::other)?;
        fs::write(path, json)
    }

    fn push(&self, level: LogLevel, message: &str, data: Option<Value>) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "medicart::request_log", "{message}"),
            LogLevel::Info => tracing::info!(target: "medicart::request_log", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "medicart::request_log", "{message}"),
            LogLevel::Error => tracing::error!(target: "medicart::request_log", "{message}"),
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_owned(),
            data,
        };

        if let Ok(mut guard) = self.inner.lock() {
            if guard.len() == MAX_ENTRIES {
                guard.pop_front();
            }
            guard.push_back(entry);
        }
    }

    /// Record a DEBUG entry.
    pub fn debug(&self, message: &str, data: Option<Value>) {
        self.push(LogLevel::Debug, message, data);
    }

    /// Record an INFO entry.
    pub fn info(&self, message: &str, data: Option<Value>) {
        self.push(LogLevel::Info, message, data);
    }

    /// Record a WARN entry.
    pub fn warn(&self, message: &str, data: Option<Value>) {
        self.push(LogLevel::Warn, message, data);
    }

    /// Record an ERROR entry.
    pub fn error(&self, message: &str, data: Option<Value>) {
        self.push(LogLevel::Error, message, data);
    }

    // =========================================================================
    // API traffic records
    // =========================================================================

    /// Record an outgoing request. Headers are redacted, payloads truncated.
    pub fn api_request(
        &self,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        payload: Option<&str>,
    ) {
        self.info(
            "API REQUEST",
            Some(json!({
                "method": method,
                "url": path,
                "headers": sanitize_headers(headers),
                "data": payload.map(|p| truncate(p, PAYLOAD_SUMMARY_LEN)),
            })),
        );
    }

    /// Record a successful response.
    pub fn api_response(&self, method: &str, path: &str, status: u16, body_size: usize) {
        self.info(
            "API RESPONSE",
            Some(json!({
                "method": method,
                "url": path,
                "status": status,
                "dataSize": body_size,
            })),
        );
    }

    /// Record a failed request.
    pub fn api_error(&self, method: &str, path: &str, status: Option<u16>, error: &str) {
        self.error(
            "API ERROR",
            Some(json!({
                "method": method,
                "url": path,
                "status": status.map_or_else(|| "UNKNOWN".to_owned(), |s| s.to_string()),
                "error": error,
            })),
        );
    }

    // =========================================================================
    // Inspection & export
    // =========================================================================

    /// Snapshot of all entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .map(|guard| guard.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Entries matching the filter, oldest first.
    #[must_use]
    pub fn filter(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| {
                if let Some(level) = filter.level
                    && entry.level != level
                {
                    return false;
                }
                if let Some(ref needle) = filter.message_contains
                    && !entry.message.contains(needle)
                {
                    return false;
                }
                if let Some(since) = filter.since
                    && entry.timestamp < since
                {
                    return false;
                }
                true
            })
            .collect()
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all entries as newline-delimited text.
    #[must_use]
    pub fn export(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| {
                let mut line = format!(
                    "[{}] [{}] {}",
                    entry.timestamp.to_rfc3339(),
                    entry.level.as_str(),
                    entry.message
                );
                if let Some(ref data) = entry.data {
                    line.push_str(" | ");
                    line.push_str(&data.to_string());
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop all entries.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.clear();
        }
    }
}

/// Redact credential-bearing headers down to a short prefix.
pub(crate) fn sanitize_headers(headers: &[(String, String)]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, value) in headers {
        let recorded = if name.eq_ignore_ascii_case("authorization") {
            redact_token(value)
        } else {
            value.clone()
        };
        map.insert(name.clone(), Value::String(recorded));
    }
    Value::Object(map)
}

/// Keep only the first few characters of a credential.
fn redact_token(value: &str) -> String {
    format!("{}...", truncate_plain(value, TOKEN_PREFIX_LEN))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        format!("{}...", truncate_plain(s, max))
    }
}

fn truncate_plain(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s.get(..idx).unwrap_or(s),
        None => s,
    }
}
