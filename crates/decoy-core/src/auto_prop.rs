//! Per-instance property bags backing auto-property mode

use dashmap::DashMap;
use decoy_object::{InstanceId, Value};
use indexmap::IndexMap;

/// Property name to last written value, for one instance
pub type AutoPropertyBag = IndexMap<String, Value>;

/// Bags keyed by instance identity, created on first access
///
/// Bags are never evicted; they live as long as the owning engine.
#[derive(Debug, Default)]
pub struct AutoPropertyStore {
    bags: DashMap<InstanceId, AutoPropertyBag>,
}

impl AutoPropertyStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to `property`, or `Undefined`
    #[must_use]
    pub fn read(&self, instance: InstanceId, property: &str) -> Value {
        self.bags
            .entry(instance)
            .or_default()
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    /// Record a write
    pub fn write(&self, instance: InstanceId, property: &str, value: Value) {
        self.bags
            .entry(instance)
            .or_default()
            .insert(property.to_string(), value);
    }

    /// Snapshot of one instance's bag
    #[must_use]
    pub fn bag(&self, instance: InstanceId) -> Option<AutoPropertyBag> {
        self.bags.get(&instance).map(|bag| bag.value().clone())
    }

    /// Number of instances with a bag
    #[must_use]
    pub fn len(&self) -> usize {
        self.bags.len()
    }

    /// Check whether no bag was created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }
}
