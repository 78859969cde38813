//! In-process key-value store.
//!
//! Clones share one backing map, so a test can hand one handle to the
//! controller and inspect or sabotage the store through another.

use super::{GatewayError, GatewayResult, KvGateway};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Shared-handle in-memory gateway with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryKvGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding one value.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let gateway = Self::new();
        if let Ok(mut state) = gateway.state.lock() {
            state.entries.insert(key.to_string(), value.to_string());
        }
        gateway
    }

    /// Makes every subsequent `get` fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_reads = fail;
        }
    }

    /// Makes every subsequent `set` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// Returns the stored value without going through failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.entries.get(key).cloned())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().map_or(0, |state| state.writes)
    }

    fn lock(&self) -> GatewayResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| GatewayError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KvGateway for MemoryKvGateway {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let state = self.lock()?;
        if state.fail_reads {
            return Err(GatewayError::Unavailable("read rejected".to_string()));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(GatewayError::Unavailable("write rejected".to_string()));
        }
        state.entries.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvGateway;
    use crate::gateway::{GatewayError, KvGateway};

    #[test]
    fn clones_share_entries() {
        let gateway = MemoryKvGateway::new();
        let observer = gateway.clone();

        gateway.set("todos", "[]").expect("set should succeed");
        assert_eq!(observer.peek("todos").as_deref(), Some("[]"));
        assert_eq!(observer.write_count(), 1);
    }

    #[test]
    fn failure_switches_reject_calls() {
        let gateway = MemoryKvGateway::with_entry("todos", "[]");
        gateway.set_fail_reads(true);
        gateway.set_fail_writes(true);

        assert!(matches!(
            gateway.get("todos"),
            Err(GatewayError::Unavailable(_))
        ));
        assert!(matches!(
            gateway.set("todos", "x"),
            Err(GatewayError::Unavailable(_))
        ));
        assert_eq!(gateway.peek("todos").as_deref(), Some("[]"));

        gateway.set_fail_reads(false);
        assert_eq!(
            gateway.get("todos").expect("get should succeed").as_deref(),
            Some("[]")
        );
    }
}
