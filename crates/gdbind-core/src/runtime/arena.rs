//! Generational arena of tracked engine handles.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::sys::{InstanceId, ObjectPtr};

/// Key of one tracked handle.
///
/// The generation detects keys that outlived their entry: once an entry is
/// removed its slot is reused under a new generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Index into HandleArena.slots
    pub index: u32,
    /// Generation for use-after-free detection
    pub generation: u32,
}

impl SlotKey {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Who is responsible for the engine object behind a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// One engine reference belongs to the tracking lifetime.
    Owned,
    /// The engine owns the object; its instance id is checked before use.
    Borrowed,
    /// Reached through the given object, which normally keeps it alive.
    /// Checked like `Borrowed`.
    BoundTo(ObjectPtr),
    /// Constructed by the caller and only released by an explicit free.
    Manual,
}

impl Ownership {
    /// Whether the engine can free the object behind the handle's back.
    pub fn needs_liveness_check(self) -> bool {
        !matches!(self, Ownership::Owned)
    }

    /// Handles of this kind hold no reference, so copies can share a slot.
    pub fn is_shared(self) -> bool {
        matches!(self, Ownership::Borrowed | Ownership::BoundTo(_))
    }
}

/// One tracked engine handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tracked {
    pub object: ObjectPtr,
    pub instance_id: InstanceId,
    pub ownership: Ownership,
    pub class: &'static str,
}

/// Handle storage with generational keys.
pub struct HandleArena {
    slots: Vec<ArenaSlot>,
    free_list: Vec<u32>,
    live: usize,
    /// Slot of the shared entry for each instance.
    shared: FxHashMap<InstanceId, SlotKey>,
}

struct ArenaSlot {
    generation: u32,
    entry: Option<Tracked>,
}

impl HandleArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            shared: FxHashMap::default(),
        }
    }

    /// Track a handle.
    pub fn insert(&mut self, entry: Tracked) -> SlotKey {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            SlotKey::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(ArenaSlot {
                generation: 0,
                entry: Some(entry),
            });
            SlotKey::new(index, 0)
        }
    }

    /// Track a handle that holds no reference.
    ///
    /// A live shared entry for the same instance is reused, so fetching the
    /// same object repeatedly does not grow the arena.
    pub fn insert_shared(&mut self, entry: Tracked) -> SlotKey {
        if entry.instance_id == InstanceId::NONE {
            return self.insert(entry);
        }
        if let Some(&key) = self.shared.get(&entry.instance_id)
            && self.get(key).is_some_and(|existing| existing.object == entry.object)
        {
            return key;
        }
        let key = self.insert(entry);
        self.shared.insert(entry.instance_id, key);
        key
    }

    /// Get a tracked entry.
    ///
    /// Returns None if the key is stale.
    pub fn get(&self, key: SlotKey) -> Option<&Tracked> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Change the ownership of a live entry.
    pub fn set_ownership(&mut self, key: SlotKey, ownership: Ownership) -> bool {
        if let Some(slot) = self.slots.get_mut(key.index as usize)
            && slot.generation == key.generation
            && let Some(entry) = slot.entry.as_mut()
        {
            entry.ownership = ownership;
            if !ownership.is_shared() && self.shared.get(&entry.instance_id) == Some(&key) {
                self.shared.remove(&entry.instance_id);
            }
            return true;
        }
        false
    }

    /// Stop tracking an entry, invalidating every copy of its key.
    pub fn remove(&mut self, key: SlotKey) -> Option<Tracked> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(key.index);
        self.live -= 1;
        if self.shared.get(&entry.instance_id) == Some(&key) {
            self.shared.remove(&entry.instance_id);
        }
        Some(entry)
    }

    /// Remove every entry, most recently inserted slot first.
    pub fn drain(&mut self) -> Vec<Tracked> {
        let mut drained = Vec::with_capacity(self.live);
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if let Some(entry) = slot.entry.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(index as u32);
                drained.push(entry);
            }
        }
        self.live = 0;
        self.shared.clear();
        drained
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live entries of one ownership kind.
    pub fn count(&self, ownership: Ownership) -> usize {
        self.slots
            .iter()
            .filter_map(|slot| slot.entry.as_ref())
            .filter(|entry| entry.ownership == ownership)
            .count()
    }
}

impl Default for HandleArena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandleArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleArena")
            .field("slot_count", &self.slots.len())
            .field("live", &self.live)
            .field("free_count", &self.free_list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(addr: usize, ownership: Ownership) -> Tracked {
        Tracked {
            object: ObjectPtr::from_addr(addr).unwrap(),
            instance_id: InstanceId(addr as u64),
            ownership,
            class: "Node",
        }
    }

    #[test]
    fn insert_and_get() {
        let mut arena = HandleArena::new();
        let key = arena.insert(tracked(0x10, Ownership::Owned));
        assert_eq!(arena.get(key).map(|t| t.object.addr()), Some(0x10));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn removed_key_is_stale() {
        let mut arena = HandleArena::new();
        let key = arena.insert(tracked(0x10, Ownership::Borrowed));
        assert!(arena.remove(key).is_some());
        assert!(!arena.contains(key));
        assert!(arena.remove(key).is_none());
        assert!(arena.is_empty());
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut arena = HandleArena::new();
        let first = arena.insert(tracked(0x10, Ownership::Owned));
        arena.remove(first);
        let second = arena.insert(tracked(0x20, Ownership::Owned));

        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second).map(|t| t.object.addr()), Some(0x20));
    }

    #[test]
    fn drain_is_lifo_and_invalidates() {
        let mut arena = HandleArena::new();
        let a = arena.insert(tracked(0x10, Ownership::Owned));
        let b = arena.insert(tracked(0x20, Ownership::Manual));

        let drained: Vec<_> = arena.drain().iter().map(|t| t.object.addr()).collect();
        assert_eq!(drained, [0x20, 0x10]);
        assert!(arena.is_empty());
        assert!(!arena.contains(a));
        assert!(!arena.contains(b));
    }

    #[test]
    fn set_ownership_and_count() {
        let mut arena = HandleArena::new();
        let key = arena.insert(tracked(0x10, Ownership::Manual));
        arena.insert(tracked(0x20, Ownership::Owned));
        assert!(arena.set_ownership(key, Ownership::Borrowed));
        assert_eq!(arena.count(Ownership::Borrowed), 1);
        assert_eq!(arena.count(Ownership::Manual), 0);

        arena.remove(key);
        assert!(!arena.set_ownership(key, Ownership::Owned));
    }

    #[test]
    fn shared_entries_reuse_their_slot() {
        let mut arena = HandleArena::new();
        let first = arena.insert_shared(tracked(0x10, Ownership::Borrowed));
        let again = arena.insert_shared(tracked(0x10, Ownership::Borrowed));
        let other = arena.insert_shared(tracked(0x20, Ownership::Borrowed));
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(arena.len(), 2);

        arena.remove(first);
        let fresh = arena.insert_shared(tracked(0x10, Ownership::Borrowed));
        assert_ne!(fresh, first);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn owned_entries_are_never_shared() {
        let mut arena = HandleArena::new();
        let shared = arena.insert_shared(tracked(0x10, Ownership::Borrowed));
        assert!(arena.set_ownership(shared, Ownership::Manual));
        let next = arena.insert_shared(tracked(0x10, Ownership::Borrowed));
        assert_ne!(shared, next);
    }
}
