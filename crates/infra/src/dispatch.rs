//! Message dispatch (delivery of approved items to their recipients).
//!
//! Dispatch is best-effort: it runs after an approval has been committed,
//! never blocks the approval, and its outcome is only ever logged.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use courier_core::{Entity, Item, ItemId};

/// Dispatch failure. Logged by the caller, never reported to clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("delivery to {recipient_id} failed: {reason}")]
    Delivery { recipient_id: String, reason: String },
    #[error("dispatcher unavailable: {0}")]
    Unavailable(String),
}

/// Delivery mechanism for approved items.
///
/// Called from a detached unit of work with an owned snapshot of the item;
/// implementations must not assume any store lock is held.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, item: &Item) -> Result<(), DispatchError>;
}

impl<D> Dispatcher for Arc<D>
where
    D: Dispatcher + ?Sized,
{
    fn dispatch(&self, item: &Item) -> Result<(), DispatchError> {
        (**self).dispatch(item)
    }
}

/// Simulated delivery: writes the message to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn dispatch(&self, item: &Item) -> Result<(), DispatchError> {
        info!(
            dispatch_id = %Uuid::now_v7(),
            item_id = %item.id(),
            recipient_id = %item.recipient_id(),
            body = item.message(),
            "sending message"
        );
        Ok(())
    }
}

/// A single recorded delivery.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub dispatch_id: Uuid,
    pub item: Item,
    pub dispatched_at: DateTime<Utc>,
}

/// In-memory dispatcher for tests/dev: remembers every delivery.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    records: Mutex<Vec<DispatchRecord>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn records(&self) -> Vec<DispatchRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(_) => vec![],
        }
    }

    /// Number of deliveries made for one item.
    pub fn count_for(&self, id: &ItemId) -> usize {
        self.records()
            .iter()
            .filter(|r| r.item.id() == id)
            .count()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, item: &Item) -> Result<(), DispatchError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| DispatchError::Unavailable("recording dispatcher lock poisoned".into()))?;
        records.push(DispatchRecord {
            dispatch_id: Uuid::now_v7(),
            item: item.clone(),
            dispatched_at: Utc::now(),
        });
        Ok(())
    }
}
