//! In-process gateways for tests and storage-less sessions.

use super::{GatewayError, GatewayResult, PersistenceGateway};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

/// `BTreeMap`-backed gateway.
///
/// Writes can be switched off, for every key or for single keys, to simulate
/// a medium that rejects them while reads keep working.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: RefCell<BTreeMap<String, String>>,
    reject_writes: Cell<bool>,
    rejected_keys: RefCell<BTreeSet<String>>,
    write_count: Cell<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let gateway = Self::new();
        gateway.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        gateway
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Rejects `set`/`remove` for `key` only; other keys stay writable.
    pub fn reject_writes_for(&self, key: impl Into<String>) {
        self.rejected_keys.borrow_mut().insert(key.into());
    }

    pub fn clear_rejected_keys(&self) {
        self.rejected_keys.borrow_mut().clear();
    }

    /// Number of successful `set`/`remove` calls.
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }

    /// Returns the raw stored value without going through the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn check_writable(&self, key: &str) -> GatewayResult<()> {
        if self.reject_writes.get() {
            return Err(GatewayError::Unavailable("memory gateway rejects writes"));
        }
        if self.rejected_keys.borrow().contains(key) {
            return Err(GatewayError::Unavailable("memory gateway rejects writes for key"));
        }
        self.write_count.set(self.write_count.get() + 1);
        Ok(())
    }
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        self.check_writable(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> GatewayResult<()> {
        self.check_writable(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Gateway for environments without any storage medium.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGateway;

impl PersistenceGateway for UnavailableGateway {
    fn get(&self, _key: &str) -> GatewayResult<Option<String>> {
        Err(GatewayError::Unavailable("no storage medium"))
    }

    fn set(&self, _key: &str, _value: &str) -> GatewayResult<()> {
        Err(GatewayError::Unavailable("no storage medium"))
    }

    fn remove(&self, _key: &str) -> GatewayResult<()> {
        Err(GatewayError::Unavailable("no storage medium"))
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryGateway, UnavailableGateway};
    use crate::gateway::{GatewayError, PersistenceGateway};

    #[test]
    fn memory_gateway_set_get_remove() {
        let gateway = MemoryGateway::new();
        assert_eq!(gateway.get("k").unwrap(), None);
        gateway.set("k", "v1").unwrap();
        gateway.set("k", "v2").unwrap();
        assert_eq!(gateway.get("k").unwrap().as_deref(), Some("v2"));
        gateway.remove("k").unwrap();
        gateway.remove("k").unwrap();
        assert_eq!(gateway.get("k").unwrap(), None);
        assert_eq!(gateway.write_count(), 4);
    }

    #[test]
    fn rejecting_writes_keeps_previous_value() {
        let gateway = MemoryGateway::with_entries([("k", "kept")]);
        gateway.set_reject_writes(true);
        let err = gateway.set("k", "lost").unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(gateway.raw("k").as_deref(), Some("kept"));
        assert_eq!(gateway.write_count(), 0);
    }

    #[test]
    fn rejecting_one_key_leaves_others_writable() {
        let gateway = MemoryGateway::with_entries([("a", "kept")]);
        gateway.reject_writes_for("a");

        assert!(matches!(
            gateway.set("a", "lost").unwrap_err(),
            GatewayError::Unavailable(_)
        ));
        assert!(gateway.remove("a").is_err());
        gateway.set("b", "written").unwrap();
        assert_eq!(gateway.raw("a").as_deref(), Some("kept"));
        assert_eq!(gateway.raw("b").as_deref(), Some("written"));
        assert_eq!(gateway.write_count(), 1);

        gateway.clear_rejected_keys();
        gateway.set("a", "now").unwrap();
        assert_eq!(gateway.raw("a").as_deref(), Some("now"));
    }

    #[test]
    fn unavailable_gateway_fails_every_call() {
        let gateway = UnavailableGateway;
        assert!(gateway.get("k").is_err());
        assert!(gateway.set("k", "v").is_err());
        assert!(gateway.remove("k").is_err());
    }
}
