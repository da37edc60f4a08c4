//! storegrid-audit — ordered, append-only record of lifecycle events.
//!
//! Appends are serialized by a single mutex, so the log's order is the
//! arrival order across all concurrent writers, and reads observe a
//! consistent snapshot. The log is in-memory only: a process restart
//! loses audit history, like the reference deployment.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle actions worth auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Created,
    Deleted,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Created => write!(f, "Created"),
            AuditAction::Deleted => write!(f, "Deleted"),
        }
    }
}

/// One audited lifecycle event. References the store by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub store_id: String,
}

impl AuditEvent {
    /// Wire rendering, e.g. `"Created store-ab12cd"`.
    pub fn render(&self) -> String {
        format!("{} {}", self.action, self.store_id)
    }
}

/// Shared handle to the audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Order is mutex acquisition order.
    pub fn record(&self, action: AuditAction, store_id: &str) {
        let event = AuditEvent {
            timestamp: Utc::now(),
            action,
            store_id: store_id.to_string(),
        };
        self.events.lock().unwrap().push(event);
    }

    /// Consistent snapshot of all events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_arrival_order() {
        let log = AuditLog::new();
        log.record(AuditAction::Created, "store-a");
        log.record(AuditAction::Created, "store-b");
        log.record(AuditAction::Deleted, "store-a");

        let rendered: Vec<String> = log.events().iter().map(AuditEvent::render).collect();
        assert_eq!(
            rendered,
            vec!["Created store-a", "Created store-b", "Deleted store-a"]
        );
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let log = AuditLog::new();
        log.record(AuditAction::Created, "store-a");
        let snapshot = log.events();
        log.record(AuditAction::Deleted, "store-a");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn concurrent_writers_all_land() {
        let log = AuditLog::new();
        let mut handles = Vec::new();
        for i in 0..8 {
            let log = log.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    log.record(AuditAction::Created, &format!("store-{i}"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.len(), 800);
    }
}
