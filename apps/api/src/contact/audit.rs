//! PII-free record of contact submissions, capped to the most recent entries.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::contact::validation::ContactFormData;
use crate::email_client::TransportError;

pub const AUDIT_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

/// One submission attempt. Carries presence flags and a length, never the
/// submitted text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub status: AuditStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub has_name: bool,
    pub has_email: bool,
    pub has_subject: bool,
    pub message_length: usize,
}

impl AuditEntry {
    fn base(status: AuditStatus, data: &ContactFormData) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            response_status: None,
            error: None,
            error_code: None,
            has_name: !data.name.is_empty(),
            has_email: !data.email.is_empty(),
            has_subject: !data.subject.is_empty(),
            message_length: data.message.chars().count(),
        }
    }

    pub fn success(data: &ContactFormData, response_status: u16) -> Self {
        Self {
            response_status: Some(response_status),
            ..Self::base(AuditStatus::Success, data)
        }
    }

    pub fn failure(data: &ContactFormData, error: &TransportError) -> Self {
        Self {
            error: Some(error.to_string()),
            error_code: Some(
                error
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ..Self::base(AuditStatus::Error, data)
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditLogError {
    #[error("audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit log encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only log with a capped-size policy: once `capacity` is reached the
/// oldest entries are dropped.
#[async_trait]
pub trait SubmissionLog: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError>;

    /// Oldest first.
    async fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError>;
}

/// Single JSON array on disk, read-modify-written on every append.
/// The in-process mutex serialises writers; other processes are not guarded.
pub struct JsonFileLog {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl JsonFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, AUDIT_LOG_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<AuditEntry>, AuditLogError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "audit log at {} is unreadable ({}); starting a fresh log",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl SubmissionLog for JsonFileLog {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read().await?;
        entries.push(entry);
        if entries.len() > self.capacity {
            let overflow = entries.len() - self.capacity;
            entries.drain(..overflow);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&entries)?).await?;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError> {
        self.read().await
    }
}

pub struct MemoryLog {
    capacity: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            capacity: AUDIT_LOG_CAPACITY,
            entries: Mutex::new(VecDeque::new()),
        }
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionLog for MemoryLog {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditLogError> {
        let mut entries = self.entries.lock().await;
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<AuditEntry>, AuditLogError> {
        Ok(self.entries.lock().await.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactFormData {
        ContactFormData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: String::new(),
            message: "Twenty-one characters".to_string(),
            company: String::new(),
        }
    }

    #[test]
    fn test_success_entry_has_no_raw_content() {
        let entry = AuditEntry::success(&form(), 200);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("ada@example.com"));
        assert!(!json.contains("Twenty-one"));
        assert!(json.contains("\"responseStatus\":200"));
        assert!(json.contains("\"hasSubject\":false"));
        assert_eq!(entry.message_length, 21);
    }

    #[test]
    fn test_failure_entry_records_code() {
        let err = TransportError::Status {
            status: 503,
            text: "down".to_string(),
        };
        let entry = AuditEntry::failure(&form(), &err);
        assert_eq!(entry.status, AuditStatus::Error);
        assert_eq!(entry.error_code.as_deref(), Some("503"));

        let other = AuditEntry::failure(&form(), &TransportError::Other("x".to_string()));
        assert_eq!(other.error_code.as_deref(), Some("unknown"));
    }

    #[tokio::test]
    async fn test_file_log_keeps_most_recent_ten() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileLog::new(dir.path().join("nested/submissions.json"));

        for status in 0..13u16 {
            log.append(AuditEntry::success(&form(), 200 + status)).await.unwrap();
        }

        let entries = log.entries().await.unwrap();
        assert_eq!(entries.len(), AUDIT_LOG_CAPACITY);
        assert_eq!(entries.first().unwrap().response_status, Some(203));
        assert_eq!(entries.last().unwrap().response_status, Some(212));
    }

    #[tokio::test]
    async fn test_file_log_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileLog::new(dir.path().join("absent.json"));
        assert!(log.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_log_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, b"{not json").unwrap();

        let log = JsonFileLog::new(&path);
        log.append(AuditEntry::success(&form(), 200)).await.unwrap();
        assert_eq!(log.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_log_is_capped() {
        let log = MemoryLog::new();
        for _ in 0..15 {
            log.append(AuditEntry::success(&form(), 200)).await.unwrap();
        }
        assert_eq!(log.entries().await.unwrap().len(), AUDIT_LOG_CAPACITY);
    }
}
