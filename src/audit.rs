//! In-memory audit trail of applied administrative actions.

use std::sync::{Mutex, MutexGuard};

use crate::admin::events::{AdminEvent, AdminObserver, EventRecord};

/// Observer that keeps every event record it is shown.
#[derive(Debug, Default)]
pub struct AuditTrail {
    entries: Mutex<Vec<EventRecord>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        // Entries are append-only, so a poisoned lock still holds a valid log.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of all recorded entries, oldest first.
    pub fn entries(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The most recent entry for which `filter` holds.
    pub fn last_matching(&self, filter: impl Fn(&AdminEvent) -> bool) -> Option<EventRecord> {
        self.lock().iter().rev().find(|r| filter(&r.event)).cloned()
    }
}

impl AdminObserver for AuditTrail {
    fn on_event(&self, record: &EventRecord) {
        self.lock().push(record.clone());
    }
}
