//! MultiMap: i32-keyed multimap over a Robin Hood open-addressing table.

use crate::error::{MultiMapError, Result};
use core::fmt;
use core::iter::FusedIterator;

/// Capacity used by `MultiMap::new`.
pub const DEFAULT_CAPACITY: usize = 256;

const LOAD_FACTOR_PERCENT: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T> {
    key: i32,
    value: T,
}

// Home slot of a key: its low bits, no mixing.
#[inline]
fn desired_pos(key: i32, mask: usize) -> usize {
    (key as u32 as usize) & mask
}

// Circular distance walking forward from `from` to `to`.
#[inline]
fn distance(from: usize, to: usize, mask: usize) -> usize {
    to.wrapping_sub(from) & mask
}

fn alloc_slots<T>(capacity: usize) -> Vec<Option<Entry<T>>> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

/// Multimap from `i32` keys to values of type `T`.
///
/// Entries live directly in a power-of-two slot array. Each key's home slot
/// is `key & (capacity - 1)`; collisions are resolved by Robin Hood probing,
/// and removal uses backward shifting so no tombstones are left behind.
/// Duplicate keys occupy separate slots.
///
/// ```
/// use robin_multimap::MultiMap;
///
/// let mut map = MultiMap::with_capacity(8).unwrap();
/// map.insert(5, "a");
/// map.insert(13, "b"); // same home slot as 5
/// map.insert(5, "c");
///
/// let mut fives: Vec<_> = map.get(5).copied().collect();
/// fives.sort_unstable();
/// assert_eq!(fives, ["a", "c"]);
/// assert_eq!(map.remove(5), 2);
/// assert_eq!(map.get(13).collect::<Vec<_>>(), [&"b"]);
/// ```
#[derive(Clone)]
pub struct MultiMap<T> {
    slots: Vec<Option<Entry<T>>>,
    len: usize,
    mask: usize,
    resize_threshold: usize,
}

impl<T> MultiMap<T> {
    pub fn new() -> Self {
        Self::with_valid_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with exactly `capacity` slots.
    ///
    /// Fails unless `capacity` is a nonzero power of two; no rounding is done.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(MultiMapError::CapacityNotPowerOfTwo(capacity));
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    fn with_valid_capacity(capacity: usize) -> Self {
        Self {
            slots: alloc_slots(capacity),
            len: 0,
            mask: capacity - 1,
            resize_threshold: capacity * LOAD_FACTOR_PERCENT / 100,
        }
    }

    /// Number of stored entries, counting every duplicate.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots. Always a power of two; only ever grows.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Adds `(key, value)` without checking for existing entries under `key`.
    pub fn insert(&mut self, key: i32, value: T) {
        self.len += 1;
        if self.len >= self.resize_threshold {
            self.grow();
        }
        self.place(Entry { key, value });
    }

    // Robin Hood placement. The caller guarantees a free slot exists.
    fn place(&mut self, mut incoming: Entry<T>) {
        let mask = self.mask;
        let mut pos = desired_pos(incoming.key, mask);
        let mut dist = 0;
        loop {
            match self.slots[pos].as_mut() {
                None => {
                    self.slots[pos] = Some(incoming);
                    return;
                }
                Some(resident) => {
                    // A resident closer to home than we are gives up its slot
                    // and continues probing in our place.
                    let resident_dist = distance(desired_pos(resident.key, mask), pos, mask);
                    if resident_dist < dist {
                        core::mem::swap(resident, &mut incoming);
                        dist = resident_dist;
                    }
                }
            }
            pos = (pos + 1) & mask;
            dist += 1;
        }
    }

    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity * 2;
        let old_slots = core::mem::replace(&mut self.slots, alloc_slots(new_capacity));
        self.mask = new_capacity - 1;
        self.resize_threshold = new_capacity * LOAD_FACTOR_PERCENT / 100;
        for entry in old_slots.into_iter().flatten() {
            self.place(entry);
        }
        tracing::debug!(old_capacity, new_capacity, len = self.len, "multimap grew");
    }

    /// Lazily yields every value stored under `key`, in probe order.
    ///
    /// Each call starts a fresh scan. Order among values sharing a key is
    /// unspecified: growth and later displacement may reorder them.
    pub fn get(&self, key: i32) -> Values<'_, T> {
        Values {
            slots: &self.slots,
            mask: self.mask,
            key,
            pos: desired_pos(key, self.mask),
            dist: 0,
            done: false,
        }
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.get(key).next().is_some()
    }

    /// Number of values stored under `key`.
    pub fn count(&self, key: i32) -> usize {
        self.get(key).count()
    }

    /// Removes every entry under `key` and returns how many were removed.
    ///
    /// Survivors in the probe chain are shifted backward so the table stays
    /// free of tombstones and the probe-order invariant keeps holding.
    pub fn remove(&mut self, key: i32) -> usize {
        let mask = self.mask;
        let mut pos = desired_pos(key, mask);
        let mut shift_pos = pos;
        let mut dist = 0;
        let mut removed = 0;

        // Scan the part of the chain that may hold `key`, deleting matches and
        // compacting the other entries over the gaps as we go.
        while let Some(entry) = &self.slots[pos] {
            if distance(desired_pos(entry.key, mask), pos, mask) < dist {
                break;
            }
            if entry.key == key {
                self.slots[pos] = None;
                removed += 1;
            } else {
                if shift_pos != pos {
                    self.shift(pos, shift_pos);
                }
                shift_pos = (shift_pos + 1) & mask;
            }
            pos = (pos + 1) & mask;
            dist += 1;
        }

        // Close the remaining gap: each following entry moves back to
        // whichever is later of the gap start and its own home slot.
        while let Some(entry) = &self.slots[pos] {
            let home = desired_pos(entry.key, mask);
            if distance(home, pos, mask) < distance(shift_pos, pos, mask) {
                shift_pos = home;
            }
            if shift_pos == pos {
                break;
            }
            self.shift(pos, shift_pos);
            shift_pos = (shift_pos + 1) & mask;
            pos = (pos + 1) & mask;
        }

        self.len -= removed;
        tracing::trace!(key, removed, "multimap remove");
        removed
    }

    #[inline]
    fn shift(&mut self, from: usize, to: usize) {
        debug_assert!(self.slots[to].is_none());
        let moved = self.slots[from].take();
        self.slots[to] = moved;
    }

    /// Empties every slot. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    /// Iterates all `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.slots.iter(),
            remaining: self.len,
        }
    }

    #[cfg(any(test, feature = "stats"))]
    pub fn probe_stats(&self) -> ProbeStats {
        let mut stats = ProbeStats::default();
        for (pos, slot) in self.slots.iter().enumerate() {
            if let Some(entry) = slot {
                let psl = distance(desired_pos(entry.key, self.mask), pos, self.mask);
                stats.occupied += 1;
                stats.total_probe_length += psl;
                stats.max_probe_length = stats.max_probe_length.max(psl);
            }
        }
        stats
    }

    /// Checks slot layout against the Robin Hood order: every displaced entry
    /// has an occupied predecessor displaced by at least one less.
    #[cfg(test)]
    pub(crate) fn check_probe_order(&self) -> core::result::Result<(), String> {
        let mask = self.mask;
        let psl = |pos: usize| {
            self.slots[pos]
                .as_ref()
                .map(|e| distance(desired_pos(e.key, mask), pos, mask))
        };
        let mut occupied = 0;
        for pos in 0..self.capacity() {
            let Some(p) = psl(pos) else { continue };
            occupied += 1;
            if p == 0 {
                continue;
            }
            let prev = (pos + mask) & mask;
            match psl(prev) {
                Some(q) if q + 1 >= p => {}
                Some(q) => return Err(format!("slot {pos} has psl {p} after psl {q}")),
                None => return Err(format!("slot {pos} has psl {p} after an empty slot")),
            }
        }
        if occupied != self.len {
            return Err(format!("len {} but {occupied} occupied slots", self.len));
        }
        Ok(())
    }
}

impl<T> Default for MultiMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for MultiMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<(i32, T)> for MultiMap<T> {
    fn extend<I: IntoIterator<Item = (i32, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T> FromIterator<(i32, T)> for MultiMap<T> {
    fn from_iter<I: IntoIterator<Item = (i32, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Probe-sequence-length statistics over all occupied slots.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub occupied: usize,
    pub max_probe_length: usize,
    pub total_probe_length: usize,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeStats {
    pub fn mean_probe_length(&self) -> f64 {
        if self.occupied == 0 {
            0.0
        } else {
            self.total_probe_length as f64 / self.occupied as f64
        }
    }
}

/// Iterator over the values stored under one key. See [`MultiMap::get`].
///
/// The cursor `(pos, dist)` is plain state; a clone continues independently.
pub struct Values<'a, T> {
    slots: &'a [Option<Entry<T>>],
    mask: usize,
    key: i32,
    pos: usize,
    dist: usize,
    done: bool,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let slots = self.slots;
        while !self.done {
            let Some(entry) = slots[self.pos].as_ref() else {
                self.done = true;
                break;
            };
            // An entry closer to its home than we are to ours means the
            // chain for `key` has ended.
            if distance(desired_pos(entry.key, self.mask), self.pos, self.mask) < self.dist {
                self.done = true;
                break;
            }
            self.pos = (self.pos + 1) & self.mask;
            self.dist += 1;
            if entry.key == self.key {
                return Some(&entry.value);
            }
        }
        None
    }
}

impl<T> FusedIterator for Values<'_, T> {}

impl<T> Clone for Values<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            mask: self.mask,
            key: self.key,
            pos: self.pos,
            dist: self.dist,
            done: self.done,
        }
    }
}

impl<T> fmt::Debug for Values<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values")
            .field("key", &self.key)
            .field("pos", &self.pos)
            .field("dist", &self.dist)
            .finish()
    }
}

/// Iterator over all entries of a `MultiMap`.
pub struct Iter<'a, T> {
    it: core::slice::Iter<'a, Option<Entry<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (i32, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self
            .it
            .find_map(|slot| slot.as_ref().map(|e| (e.key, &e.value)))?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> IntoIterator for &'a MultiMap<T> {
    type Item = (i32, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
