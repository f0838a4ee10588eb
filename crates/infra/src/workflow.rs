//! Approval workflow (application-level orchestration).
//!
//! Composes an [`ItemStore`] with a [`Dispatcher`]:
//!
//! ```text
//! approve(id)
//!   ↓
//! 1. Store sets status = approved (under the store lock)
//!   ↓
//! 2. Lock released, snapshot of the approved item returned
//!   ↓
//! 3. Snapshot handed to a detached task that calls the dispatcher
//!   ↓
//! 4. Caller gets the snapshot back without waiting for step 3
//! ```
//!
//! Dispatch failures are logged and dropped. Concurrent approvals of the
//! same item may each dispatch (at-least-once).

use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use courier_core::{DomainResult, Entity, Item, ItemId, NewItem};

use crate::dispatch::Dispatcher;
use crate::store::ItemStore;

pub struct ApprovalWorkflow<S, D: ?Sized> {
    store: S,
    dispatcher: Arc<D>,
}

impl<S, D> Clone for ApprovalWorkflow<S, D>
where
    S: Clone,
    D: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<S, D> ApprovalWorkflow<S, D>
where
    S: ItemStore,
    D: Dispatcher + ?Sized,
{
    pub fn new(store: S, dispatcher: Arc<D>) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new item; it starts `Pending`.
    pub fn create(&self, new: NewItem) -> DomainResult<Item> {
        match self.store.insert(new) {
            Ok(item) => {
                info!(item_id = %item.id(), recipient_id = %item.recipient_id(), "item created");
                Ok(item)
            }
            Err(e) => {
                debug!(error = %e, "create refused");
                Err(e)
            }
        }
    }

    /// Approve an item and schedule delivery of its message.
    ///
    /// Succeeds as soon as the status change is stored. Delivery runs
    /// afterwards on its own and cannot fail this call.
    pub fn approve(&self, id: &ItemId) -> DomainResult<Item> {
        let item = self.store.approve(id).inspect_err(|e| {
            debug!(item_id = %id, error = %e, "approve refused");
        })?;
        info!(item_id = %id, "item approved");

        self.spawn_dispatch(item.clone());
        Ok(item)
    }

    /// Reject an item. Refused once the item has been approved.
    pub fn reject(&self, id: &ItemId) -> DomainResult<Item> {
        let item = self.store.reject(id).inspect_err(|e| {
            debug!(item_id = %id, error = %e, "reject refused");
        })?;
        info!(item_id = %id, "item rejected");
        Ok(item)
    }

    /// Snapshot of all items, unordered.
    pub fn list(&self) -> DomainResult<Vec<Item>> {
        self.store.list()
    }

    fn spawn_dispatch(&self, item: Item) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let job = move || {
            if let Err(e) = dispatcher.dispatch(&item) {
                warn!(item_id = %item.id(), error = %e, "dispatch failed");
            }
        };

        // Inside a Tokio runtime use its blocking pool; otherwise a thread.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                if let Err(e) = thread::Builder::new()
                    .name("courier-dispatch".to_string())
                    .spawn(job)
                {
                    warn!(error = %e, "failed to spawn dispatch thread");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, mpsc};
    use std::time::{Duration, Instant};

    use courier_core::{DomainError, ItemStatus};

    use super::*;
    use crate::dispatch::{DispatchError, RecordingDispatcher};
    use crate::store::InMemoryItemStore;

    type TestWorkflow = ApprovalWorkflow<Arc<InMemoryItemStore>, RecordingDispatcher>;

    fn workflow() -> (TestWorkflow, Arc<RecordingDispatcher>) {
        let dispatcher = RecordingDispatcher::arc();
        let wf = ApprovalWorkflow::new(InMemoryItemStore::arc(), dispatcher.clone());
        (wf, dispatcher)
    }

    fn wait_for_dispatches(dispatcher: &RecordingDispatcher, id: &ItemId, at_least: usize) -> usize {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let n = dispatcher.count_for(id);
            if n >= at_least || Instant::now() >= deadline {
                return n;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Holds every delivery until the test opens the gate.
    struct GatedDispatcher {
        gate: Mutex<mpsc::Receiver<()>>,
        inner: RecordingDispatcher,
    }

    impl Dispatcher for GatedDispatcher {
        fn dispatch(&self, item: &Item) -> Result<(), DispatchError> {
            let gate = self.gate.lock().map_err(|_| DispatchError::Unavailable("gate".into()))?;
            let _ = gate.recv();
            self.inner.dispatch(item)
        }
    }

    struct FailingDispatcher;

    impl Dispatcher for FailingDispatcher {
        fn dispatch(&self, item: &Item) -> Result<(), DispatchError> {
            Err(DispatchError::Delivery {
                recipient_id: item.recipient_id().to_string(),
                reason: "unreachable".into(),
            })
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let (wf, dispatcher) = workflow();
        let id = ItemId::from("1");

        let created = wf.create(NewItem::new("1", "hi", "r1")).unwrap();
        assert_eq!(created.status(), ItemStatus::Pending);

        let approved = wf.approve(&id).unwrap();
        assert_eq!(approved.status(), ItemStatus::Approved);
        assert_eq!(wait_for_dispatches(&dispatcher, &id, 1), 1);

        let err = wf.reject(&id).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let items = wf.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status(), ItemStatus::Approved);

        let delivered = &dispatcher.records()[0].item;
        assert_eq!(delivered.message(), "hi");
        assert_eq!(delivered.recipient_id().as_str(), "r1");
    }

    #[test]
    fn refused_operations_never_dispatch() {
        let (wf, dispatcher) = workflow();

        assert!(wf.approve(&ItemId::from("nope")).is_err());
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();
        wf.reject(&ItemId::from("1")).unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(dispatcher.records().is_empty());
    }

    #[test]
    fn rejected_items_can_be_approved_and_dispatched() {
        let (wf, dispatcher) = workflow();
        let id = ItemId::from("1");
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();
        wf.reject(&id).unwrap();

        assert_eq!(wf.approve(&id).unwrap().status(), ItemStatus::Approved);
        assert_eq!(wait_for_dispatches(&dispatcher, &id, 1), 1);
    }

    #[test]
    fn approve_does_not_wait_for_dispatch_or_hold_the_lock() {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Arc::new(GatedDispatcher {
            gate: Mutex::new(rx),
            inner: RecordingDispatcher::new(),
        });
        let wf = ApprovalWorkflow::new(InMemoryItemStore::arc(), dispatcher.clone());
        let id = ItemId::from("1");
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();

        // Dispatch is parked on the gate; both calls below must still return.
        assert_eq!(wf.approve(&id).unwrap().status(), ItemStatus::Approved);
        assert_eq!(wf.list().unwrap().len(), 1);
        assert!(dispatcher.inner.records().is_empty());

        tx.send(()).unwrap();
        assert_eq!(wait_for_dispatches(&dispatcher.inner, &id, 1), 1);
    }

    #[test]
    fn dispatch_failure_is_not_reported() {
        let wf = ApprovalWorkflow::new(InMemoryItemStore::arc(), Arc::new(FailingDispatcher));
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();

        let approved = wf.approve(&ItemId::from("1")).unwrap();
        assert_eq!(approved.status(), ItemStatus::Approved);
    }

    #[test]
    fn concurrent_approvals_all_succeed() {
        let (wf, dispatcher) = workflow();
        let id = ItemId::from("1");
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let wf = wf.clone();
                let id = id.clone();
                thread::spawn(move || wf.approve(&id))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap().status(), ItemStatus::Approved);
        }

        assert_eq!(wf.list().unwrap()[0].status(), ItemStatus::Approved);
        assert!(wait_for_dispatches(&dispatcher, &id, 8) >= 1);
    }

    #[test]
    fn concurrent_distinct_creates_are_all_listed_once() {
        let (wf, _dispatcher) = workflow();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let wf = wf.clone();
                thread::spawn(move || wf.create(NewItem::new(format!("item-{i}"), "m", "r")))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        let mut ids: Vec<_> = wf.list().unwrap().into_iter().map(|i| i.id().clone()).collect();
        ids.sort();
        let expected: Vec<_> = {
            let mut v: Vec<_> = (0..32).map(|i| ItemId::from(format!("item-{i}"))).collect();
            v.sort();
            v
        };
        assert_eq!(ids, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dispatch_runs_on_the_runtime_when_present() {
        let (wf, dispatcher) = workflow();
        let id = ItemId::from("1");
        wf.create(NewItem::new("1", "hi", "r1")).unwrap();
        wf.approve(&id).unwrap();

        for _ in 0..500 {
            if dispatcher.count_for(&id) == 1 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("dispatch did not run within timeout");
    }
}
