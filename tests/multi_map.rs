// MultiMap integration tests against the public surface.
//
// Each test documents what behavior is being verified. The core
// invariants exercised:
// - Round trip: every inserted (key, value) is retrievable under its key.
// - Duplicates: all values under one key are returned and removed together.
// - Non-interference: keys sharing a home slot never see each other.
// - Growth: capacity doubles at the 75% threshold and contents survive.
// - Accounting: len == inserts - sum(remove results).
use robin_multimap::{MultiMap, MultiMapError, DEFAULT_CAPACITY};

fn values_of(m: &MultiMap<String>, key: i32) -> Vec<String> {
    let mut v: Vec<String> = m.get(key).cloned().collect();
    v.sort();
    v
}

// Test: duplicate-key fidelity.
// Verifies: three values under one key come back, remove reports 3, and the
// key is gone afterward.
#[test]
fn duplicate_key_fidelity() {
    let mut m = MultiMap::new();
    for v in ["a", "b", "c"] {
        m.insert(5, v.to_string());
    }
    assert_eq!(values_of(&m, 5), ["a", "b", "c"]);
    assert_eq!(m.remove(5), 3);
    assert!(values_of(&m, 5).is_empty());
    assert!(m.is_empty());
}

// Test: non-interference in a capacity-8 table.
// Assumes: 5 & 7 == 13 & 7, so both keys share home slot 5.
// Verifies: each key sees only its own value, before and after removal.
#[test]
fn colliding_keys_are_independent() {
    let mut m = MultiMap::with_capacity(8).expect("power of two");
    m.insert(5, "a".to_string());
    m.insert(13, "b".to_string());
    assert_eq!(values_of(&m, 5), ["a"]);
    assert_eq!(values_of(&m, 13), ["b"]);

    assert_eq!(m.remove(5), 1);
    assert_eq!(values_of(&m, 13), ["b"]);
    assert_eq!(m.len(), 1);
}

// Test: construction validation.
// Verifies: non-powers of two are rejected with the offending capacity, and
// the error message names it.
#[test]
fn construction_rejects_bad_capacity() {
    let err = MultiMap::<u8>::with_capacity(12).unwrap_err();
    assert_eq!(err, MultiMapError::CapacityNotPowerOfTwo(12));
    assert!(err.to_string().contains("12"));
    assert!(MultiMap::<u8>::with_capacity(0).is_err());
    assert_eq!(MultiMap::<u8>::default().capacity(), DEFAULT_CAPACITY);
}

// Test: growth transparency across several doublings.
// Verifies: capacity is exactly doubled at each threshold crossing and every
// earlier pair stays retrievable.
#[test]
fn growth_is_transparent() {
    let mut m = MultiMap::with_capacity(4).expect("power of two");
    let mut caps = vec![m.capacity()];
    for k in 0..100 {
        m.insert(k, k.to_string());
        m.insert(k, format!("{k}'"));
        if *caps.last().unwrap() != m.capacity() {
            assert_eq!(m.capacity(), caps.last().unwrap() * 2);
            caps.push(m.capacity());
        }
        for j in 0..=k {
            assert_eq!(values_of(&m, j), [j.to_string(), format!("{j}'")]);
        }
    }
    assert_eq!(caps, [4, 8, 16, 32, 64, 128, 256, 512]);
    assert_eq!(m.len(), 200);
}

// Test: idempotent empty removal.
// Verifies: removing a never-inserted or already-removed key returns 0 and
// leaves the contents unchanged.
#[test]
fn removing_missing_key_changes_nothing() {
    let mut m: MultiMap<String> = (0..10).map(|k| (k * 8, k.to_string())).collect();
    let before: Vec<(i32, String)> = m.iter().map(|(k, v)| (k, v.clone())).collect();
    assert_eq!(m.remove(3), 0);
    assert_eq!(m.remove(-8), 0);
    let after: Vec<(i32, String)> = m.iter().map(|(k, v)| (k, v.clone())).collect();
    assert_eq!(before, after);

    assert_eq!(m.remove(16), 1);
    assert_eq!(m.remove(16), 0);
    assert_eq!(m.len(), 9);
}

// Test: size accounting over an interleaved sequence.
// Verifies: len == inserts - cumulative remove counts.
#[test]
fn size_accounting() {
    let mut m = MultiMap::with_capacity(2).expect("power of two");
    let mut inserts = 0;
    let mut removed = 0;
    for round in 0..20 {
        for k in 0..round {
            m.insert(k % 7, round);
            inserts += 1;
        }
        removed += m.remove(round % 7);
        assert_eq!(m.len(), inserts - removed);
    }
}

// Test: extreme keys.
// Verifies: i32::MIN, i32::MAX, 0 and -1 are all ordinary keys.
#[test]
fn extreme_keys() {
    let mut m = MultiMap::with_capacity(16).expect("power of two");
    for k in [i32::MIN, i32::MAX, 0, -1] {
        m.insert(k, k.to_string());
    }
    for k in [i32::MIN, i32::MAX, 0, -1] {
        assert_eq!(values_of(&m, k), [k.to_string()]);
    }
    assert_eq!(m.remove(-1), 1);
    assert!(m.contains_key(i32::MAX));
    assert!(!m.contains_key(-1));
}

// Test: lazy lookup restarts.
// Verifies: two scans of the same key yield the same sequence; a scan that
// was never started costs nothing and is simply dropped.
#[test]
fn lookup_is_restartable() {
    let mut m = MultiMap::new();
    for v in 0..5 {
        m.insert(42, v);
        m.insert(42 + 256, v + 10);
    }
    let first: Vec<_> = m.get(42).collect();
    let second: Vec<_> = m.get(42).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    let _unused = m.get(42);
    assert_eq!(m.count(42 + 256), 5);
}

// Test: Debug formatting lists entries.
#[test]
fn debug_lists_entries() {
    let mut m = MultiMap::with_capacity(4).expect("power of two");
    m.insert(1, 'x');
    assert_eq!(format!("{m:?}"), "[(1, 'x')]");
}
