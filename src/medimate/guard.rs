//! # In-flight Guards
//!
//! Every logical resource that can be mutated (the medication collection and the single
//! reminder slot) carries an [`InFlight`] flag. A mutation enters the guard before it
//! touches state and holds the returned [`FlightGuard`] until it has committed and
//! notified subscribers. Entering a guard that is already held fails with
//! [`MedimateError::Busy`] instead of interleaving two mutations.
//!
//! The flag is a `Cell<bool>`: medimate is single-threaded, so the only way to reach a
//! held guard is re-entrancy (a subscriber or notifier calling back into the owner).

use crate::error::{MedimateError, Result};
use std::cell::Cell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Medications,
    ReminderSlot,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Medications => write!(f, "medication collection"),
            Resource::ReminderSlot => write!(f, "reminder slot"),
        }
    }
}

#[derive(Debug)]
pub struct InFlight {
    resource: Resource,
    busy: Cell<bool>,
}

impl InFlight {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            busy: Cell::new(false),
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Claim the resource. The claim is released when the guard is dropped.
    pub fn enter(&self) -> Result<FlightGuard<'_>> {
        if self.busy.replace(true) {
            return Err(MedimateError::Busy(self.resource));
        }
        Ok(FlightGuard { owner: self })
    }
}

#[must_use = "the resource is released as soon as the guard is dropped"]
pub struct FlightGuard<'a> {
    owner: &'a InFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_refused_while_held() {
        let flight = InFlight::new(Resource::Medications);
        let _held = flight.enter().unwrap();

        assert!(matches!(
            flight.enter(),
            Err(MedimateError::Busy(Resource::Medications))
        ));
    }

    #[test]
    fn dropping_the_guard_releases_the_resource() {
        let flight = InFlight::new(Resource::ReminderSlot);
        {
            let _held = flight.enter().unwrap();
            assert!(flight.is_busy());
        }
        assert!(!flight.is_busy());
        assert!(flight.enter().is_ok());
    }

    #[test]
    fn guard_is_released_on_early_return() {
        fn failing(flight: &InFlight) -> Result<()> {
            let _held = flight.enter()?;
            Err(MedimateError::Api("boom".into()))
        }

        let flight = InFlight::new(Resource::Medications);
        assert!(failing(&flight).is_err());
        assert!(!flight.is_busy());
    }
}
