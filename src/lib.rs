//! robin-multimap: a single-threaded multimap from `i32` keys to values,
//! built on Robin Hood open addressing with backward-shift deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a flat multimap whose lookups stop early, whose deletions leave
//!   no tombstones, and whose keys are used directly as table indices.
//! - Layers:
//!   - MultiMap<T>: the table. One slot array of `Option<Entry>`; keys are
//!     placed by Robin Hood probing from `key & mask`.
//!   - TransitionTable<G, U>: a thin consumer that stores symbolic-automaton
//!     transitions keyed by source state.
//!
//! Constraints
//! - Capacity is always a power of two; construction rejects anything else.
//! - Growth doubles capacity once the entry count reaches 75% of it, and
//!   the table never shrinks.
//! - Duplicate keys are allowed and occupy separate slots.
//! - No hash mixing: a key's home slot is its low bits.
//!
//! Probe-order invariant
//! - Walking forward from any entry's home slot, no empty slot is crossed
//!   before reaching it, and an entry displaced by `p` slots always follows
//!   one displaced by at least `p - 1`. Insertion keeps this by swapping
//!   with any resident that is closer to home than the incoming entry.
//!   Lookup relies on it to stop at the first entry closer to home than the
//!   probe. Removal restores it by shifting survivors backward.
//!
//! Why an explicit empty slot?
//! - Occupancy is `Option`, not a reserved key value, so every `i32`
//!   (including 0) is an ordinary key.
//!
//! Enumeration
//! - `MultiMap::get` returns a lazy `Values` iterator holding a shared
//!   borrow of the table, so the table cannot be mutated while a scan is in
//!   progress. Each call to `get` starts a fresh scan.
//!
//! Notes and non-goals
//! - Single-threaded; no interior mutability.
//! - No generic keys, persistence, or shrink-on-delete.
//! - Order among values sharing a key is unspecified.

pub mod error;
pub mod multi_map;
mod multi_map_proptest;
pub mod transition;

// Public surface
pub use error::{MultiMapError, Result};
#[cfg(any(test, feature = "stats"))]
pub use multi_map::ProbeStats;
pub use multi_map::{Iter, MultiMap, Values, DEFAULT_CAPACITY};
pub use transition::{StateId, Transition, TransitionTable};
