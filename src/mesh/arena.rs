//! Slot storage with tombstoned deletion.
//!
//! An [`Arena`] stores one kind of mesh element as a list of [`Slot`]s. Each slot
//! holds the element's topology record, its user payload and a liveness flag.
//! Removing an element only clears the flag; [`Arena::compact`] drops dead slots
//! and reports where every surviving slot moved.

use serde::{Deserialize, Serialize};

/// One storage slot: topology, payload and liveness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot<T, D> {
    /// Adjacency record (handles only).
    pub topo: T,
    /// Caller payload.
    pub data: D,
    pub(crate) exists: bool,
}

impl<T, D> Slot<T, D> {
    /// Whether this slot holds a live element.
    #[inline]
    pub fn exists(&self) -> bool {
        self.exists
    }
}

/// Parallel-array storage for one element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T, D> {
    slots: Vec<Slot<T, D>>,
}

impl<T, D> Default for Arena<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> Arena<T, D> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Create an empty arena with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, including tombstones.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena has no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live slots.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.exists).count()
    }

    /// Append a live slot and return its position.
    pub fn push(&mut self, topo: T, data: D) -> usize {
        self.slots.push(Slot {
            topo,
            data,
            exists: true,
        });
        self.slots.len() - 1
    }

    /// Slot at `index`, dead or alive.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Slot<T, D>> {
        self.slots.get(index)
    }

    /// Mutable slot at `index`, dead or alive.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slot<T, D>> {
        self.slots.get_mut(index)
    }

    /// Whether `index` refers to an allocated, live slot.
    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.exists)
    }

    /// Mark a slot dead. Returns `false` if it already was.
    pub(crate) fn kill(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.exists => {
                slot.exists = false;
                true
            }
            _ => false,
        }
    }

    /// Iterate over the positions of live slots.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.exists)
            .map(|(i, _)| i)
    }

    /// Iterate over all slots, dead or alive.
    pub fn slots(&self) -> impl Iterator<Item = &Slot<T, D>> + '_ {
        self.slots.iter()
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<T, D>> + '_ {
        self.slots.iter_mut()
    }

    /// Remove every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drop dead slots, preserving the order of the survivors.
    ///
    /// Returns a table mapping each old position to its new position, or `None`
    /// for slots that were dropped.
    pub fn compact(&mut self) -> Vec<Option<usize>> {
        let mut table = Vec::with_capacity(self.slots.len());
        let mut next = 0;
        for slot in &self.slots {
            if slot.exists {
                table.push(Some(next));
                next += 1;
            } else {
                table.push(None);
            }
        }
        self.slots.retain(|s| s.exists);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_kill() {
        let mut arena: Arena<(), &str> = Arena::new();
        let a = arena.push((), "a");
        let b = arena.push((), "b");
        assert_eq!(arena.live_count(), 2);

        assert!(arena.kill(a));
        assert!(!arena.kill(a));
        assert!(!arena.kill(99));
        assert!(!arena.is_live(a));
        assert!(arena.is_live(b));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.live_indices().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_compact_remaps_survivors() {
        let mut arena: Arena<(), u8> = Arena::new();
        for i in 0..5 {
            arena.push((), i);
        }
        arena.kill(1);
        arena.kill(3);

        let table = arena.compact();
        assert_eq!(table, vec![Some(0), None, Some(1), None, Some(2)]);
        let data: Vec<u8> = arena.slots().map(|s| s.data).collect();
        assert_eq!(data, vec![0, 2, 4]);
    }
}
