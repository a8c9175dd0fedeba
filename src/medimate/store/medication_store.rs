//! # Medication Store
//!
//! The single owner of the medication collection. It wraps the pure reducer with:
//!
//! - **Hydration**: the snapshot is read once, when the store is opened.
//! - **Flush-then-commit**: every state change is written to the backend first and only
//!   becomes visible in memory once the write succeeded. A failed write (after the
//!   configured retries) leaves the previous state in place and is returned to the caller.
//! - **Subscriptions**: listeners receive the committed state after each change.
//! - **In-flight guard**: mutations cannot interleave; a listener that tries to mutate the
//!   store while being notified gets [`MedimateError::Busy`].
//!
//! Not-found is not an error here. Mutations report [`Outcome::NotFound`] and skip the flush.

use super::backend::KeyValueBackend;
use super::SNAPSHOT_KEY;
use crate::error::{MedimateError, Result};
use crate::guard::{InFlight, Resource};
use crate::model::{
    MedicationRecord, MedicationState, NewSchedule, PersistedSnapshot, SNAPSHOT_VERSION,
};
use crate::reducer::{reduce, Action, Outcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

type Listener = Rc<dyn Fn(&MedicationState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Borrowed form of [`PersistedSnapshot`] so flushing does not clone the collection.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: &'a MedicationState,
    version: u32,
}

pub struct MedicationStore<B: KeyValueBackend> {
    backend: B,
    state: RefCell<MedicationState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
    flush_retries: u32,
    in_flight: InFlight,
}

impl<B: KeyValueBackend> MedicationStore<B> {
    /// Open the store, rehydrating the persisted snapshot (empty if none was written).
    pub fn open(backend: B) -> Result<Self> {
        let state = load_snapshot(&backend)?;
        debug!(
            medications = state.medications.len(),
            next_id = state.next_id,
            "hydrated medication store"
        );
        Ok(Self {
            backend,
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
            flush_retries: 0,
            in_flight: InFlight::new(Resource::Medications),
        })
    }

    /// Additional attempts made when writing the snapshot fails.
    pub fn with_flush_retries(mut self, retries: u32) -> Self {
        self.flush_retries = retries;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Reads ---

    pub fn get(&self, id: &str) -> Option<MedicationRecord> {
        self.state.borrow().find(id).cloned()
    }

    pub fn medications(&self) -> Vec<MedicationRecord> {
        self.state.borrow().medications.clone()
    }

    pub fn snapshot(&self) -> MedicationState {
        self.state.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Mutations ---

    /// Append a new medication and return its id. Input is not validated here.
    pub fn add_medication(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        schedules: Vec<NewSchedule>,
    ) -> Result<String> {
        let outcome = self.apply(Action::Add {
            name: name.into(),
            description: Some(description.into()),
            schedules,
        })?;
        match outcome {
            Outcome::Added(id) => Ok(id),
            other => Err(MedimateError::Api(format!(
                "unexpected outcome for add: {:?}",
                other
            ))),
        }
    }

    pub fn remove_medication(&self, id: &str) -> Result<Outcome> {
        self.apply(Action::Remove { id: id.to_string() })
    }

    pub fn mark_dose_taken(&self, id: &str, time: &str) -> Result<Outcome> {
        self.mark_dose_taken_at(id, time, Utc::now())
    }

    pub fn mark_dose_taken_at(&self, id: &str, time: &str, at: DateTime<Utc>) -> Result<Outcome> {
        self.apply(Action::MarkDoseTaken {
            id: id.to_string(),
            time: time.to_string(),
            at,
        })
    }

    // --- Subscriptions ---

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&MedicationState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn apply(&self, action: Action) -> Result<Outcome> {
        let _guard = self.in_flight.enter()?;

        let (next, outcome) = reduce(&self.state.borrow(), action);
        if !outcome.is_found() {
            debug!("medication lookup missed, nothing to persist");
            return Ok(outcome);
        }

        self.flush(&next)?;
        *self.state.borrow_mut() = next;
        info!(?outcome, "medication store updated");

        self.notify();
        Ok(outcome)
    }

    fn flush(&self, state: &MedicationState) -> Result<()> {
        let payload = serde_json::to_string(&SnapshotRef {
            state,
            version: SNAPSHOT_VERSION,
        })?;

        let mut attempt = 0;
        loop {
            match self.backend.set(SNAPSHOT_KEY, &payload) {
                Ok(()) => {
                    debug!(bytes = payload.len(), "flushed medication snapshot");
                    return Ok(());
                }
                Err(e) if attempt < self.flush_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "snapshot flush failed, retrying");
                }
                Err(e) => {
                    error!(error = %e, "snapshot flush failed, keeping previous state");
                    return Err(match e {
                        MedimateError::Persistence(_) => e,
                        other => MedimateError::Persistence(other.to_string()),
                    });
                }
            }
        }
    }

    fn notify(&self) {
        // Listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        let state = self.snapshot();
        for listener in listeners {
            listener(&state);
        }
    }
}

fn load_snapshot<B: KeyValueBackend>(backend: &B) -> Result<MedicationState> {
    let Some(raw) = backend.get(SNAPSHOT_KEY)? else {
        return Ok(MedicationState::default());
    };
    let snapshot: PersistedSnapshot = serde_json::from_str(&raw)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(MedimateError::Persistence(format!(
            "snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    Ok(snapshot.state)
}
