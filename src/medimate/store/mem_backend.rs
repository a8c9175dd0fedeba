use super::backend::KeyValueBackend;
use crate::error::{MedimateError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory key-value backend for testing.
///
/// Uses `RefCell` for interior mutability since medimate is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<String, String>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
    /// Number of upcoming writes that fail before writes succeed again.
    failing_writes: Cell<u32>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail until switched off.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make every read fail until switched off.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Make only the next `count` writes fail.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.set(count);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(MedimateError::Persistence(
                "Simulated read error".to_string(),
            ));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(MedimateError::Persistence(
                "Simulated write error".to_string(),
            ));
        }
        let pending = self.failing_writes.get();
        if pending > 0 {
            self.failing_writes.set(pending - 1);
            return Err(MedimateError::Persistence(
                "Simulated write error".to_string(),
            ));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(MedimateError::Persistence(
                "Simulated write error".to_string(),
            ));
        }
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_next_writes_recovers() {
        let backend = MemBackend::new();
        backend.fail_next_writes(2);

        assert!(backend.set("k", "1").is_err());
        assert!(backend.set("k", "2").is_err());
        backend.set("k", "3").unwrap();
        assert_eq!(backend.raw("k").as_deref(), Some("3"));
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn simulated_read_error_surfaces() {
        let backend = MemBackend::new();
        backend.set("k", "v").unwrap();
        backend.set_simulate_read_error(true);
        assert!(matches!(
            backend.get("k"),
            Err(MedimateError::Persistence(_))
        ));
    }
}
