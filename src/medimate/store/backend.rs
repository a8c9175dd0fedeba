use crate::error::Result;
use std::rc::Rc;

/// Abstract interface for raw key-value storage.
///
/// The backend is passive: it has no lifecycle of its own and knows nothing about the
/// values it stores. All methods take `&self` so one backend can be shared by the
/// store, the scheduler and the notifier; implementations use interior mutability.
pub trait KeyValueBackend {
    /// Read a value. Returns Ok(None) if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    /// MUST be atomic: readers see either the old or the new value, never a mix.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueBackend + ?Sized> KeyValueBackend for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueBackend + ?Sized> KeyValueBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
