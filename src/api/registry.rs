use indexmap::IndexMap;

use crate::core::{AggregateHandle, AggregateId, AttributeId};

/// Dashboard-wide index of live aggregates.
///
/// Holds handles only; attributes own the aggregates themselves. Entries are
/// added and removed exclusively by the binning pass and attribute resets.
#[derive(Debug, Default)]
pub struct AggregateRegistry {
    live: IndexMap<AggregateId, AttributeId>,
    next_id: u64,
}

impl AggregateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh id for `owner` and records it as live.
    pub(crate) fn register(&mut self, owner: AttributeId) -> AggregateId {
        let id = AggregateId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, owner);
        id
    }

    pub(crate) fn unregister(&mut self, id: AggregateId) -> bool {
        self.live.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn owner_of(&self, id: AggregateId) -> Option<AttributeId> {
        self.live.get(&id).copied()
    }

    #[must_use]
    pub fn handle(&self, id: AggregateId) -> Option<AggregateHandle> {
        self.owner_of(id)
            .map(|attribute| AggregateHandle::new(attribute, id))
    }

    #[must_use]
    pub fn contains(&self, handle: AggregateHandle) -> bool {
        self.owner_of(handle.aggregate) == Some(handle.attribute)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = AggregateHandle> + '_ {
        self.live
            .iter()
            .map(|(&aggregate, &attribute)| AggregateHandle::new(attribute, aggregate))
    }

    pub fn handles_of(&self, attribute: AttributeId) -> impl Iterator<Item = AggregateHandle> + '_ {
        self.handles()
            .filter(move |handle| handle.attribute == attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::AggregateRegistry;
    use crate::core::AttributeId;

    #[test]
    fn ids_are_never_reused() {
        let mut registry = AggregateRegistry::new();
        let first = registry.register(AttributeId(0));
        assert!(registry.unregister(first));
        let second = registry.register(AttributeId(0));
        assert_ne!(first, second);
        assert!(registry.owner_of(first).is_none());
        assert!(!registry.unregister(first));
    }

    #[test]
    fn handles_filter_by_owner() {
        let mut registry = AggregateRegistry::new();
        registry.register(AttributeId(0));
        registry.register(AttributeId(1));
        registry.register(AttributeId(1));
        assert_eq!(registry.handles_of(AttributeId(1)).count(), 2);
        assert_eq!(registry.len(), 3);
    }
}
