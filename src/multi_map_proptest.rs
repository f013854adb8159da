#![cfg(test)]

// Property tests for MultiMap kept inside the crate so they can inspect the
// slot layout directly.

use crate::multi_map::MultiMap;
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(i32, u32),
    Remove(i32),
    Get(i32),
    Clear,
}

fn arb_ops(key: impl Strategy<Value = i32> + Clone) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        6 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Get),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

// Small keys plus arbitrary ones, negatives included.
fn arb_key() -> impl Strategy<Value = i32> + Clone {
    prop_oneof![-8i32..8, any::<i32>()]
}

// Keys drawn from a handful of low-bit classes so nearly everything collides.
fn colliding_key() -> impl Strategy<Value = i32> + Clone {
    (0i32..3, -4i32..4).prop_map(|(low, high)| low + high * 1024)
}

fn sorted(mut v: Vec<u32>) -> Vec<u32> {
    v.sort_unstable();
    v
}

fn snapshot(m: &MultiMap<u32>) -> Vec<(i32, u32)> {
    m.iter().map(|(k, v)| (k, *v)).collect()
}

// Runs `ops` against a MultiMap and a HashMap<i32, Vec<u32>> model. After
// every step:
// - the probe-order invariant holds and `len` equals the occupied slot count;
// - `len` equals inserts minus everything reported removed;
// - capacity doubles exactly when the 75% threshold is reached.
// Per op:
// - `remove` returns the number of model values for the key, and a miss
//   leaves the slot layout byte-for-byte unchanged;
// - `get` yields the model's multiset for the key.
fn run_against_model(capacity_log2: u32, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut: MultiMap<u32> = MultiMap::with_capacity(1 << capacity_log2).unwrap();
    let mut model: HashMap<i32, Vec<u32>> = HashMap::new();
    let mut inserted = 0usize;
    let mut removed = 0usize;

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let cap = sut.capacity();
                let grows = sut.len() + 1 >= cap * 75 / 100;
                sut.insert(k, v);
                model.entry(k).or_default().push(v);
                inserted += 1;
                let expected = if grows { cap * 2 } else { cap };
                prop_assert_eq!(sut.capacity(), expected);
            }
            Op::Remove(k) => {
                let before = snapshot(&sut);
                let n = sut.remove(k);
                let expected = model.remove(&k).map_or(0, |vs| vs.len());
                prop_assert_eq!(n, expected);
                if n == 0 {
                    prop_assert_eq!(snapshot(&sut), before);
                }
                prop_assert!(!sut.contains_key(k));
                removed += n;
            }
            Op::Get(k) => {
                let got = sorted(sut.get(k).copied().collect());
                let want = sorted(model.get(&k).cloned().unwrap_or_default());
                prop_assert_eq!(got, want);
            }
            Op::Clear => {
                let cap = sut.capacity();
                removed += sut.len();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
            }
        }

        if let Err(msg) = sut.check_probe_order() {
            return Err(TestCaseError::fail(msg));
        }
        prop_assert_eq!(sut.len(), inserted - removed);
        prop_assert_eq!(sut.len(), model.values().map(Vec::len).sum::<usize>());
        prop_assert!(sut.capacity().is_power_of_two());
    }

    for (k, vs) in &model {
        let got = sorted(sut.get(*k).copied().collect());
        prop_assert_eq!(got, sorted(vs.clone()));
        prop_assert_eq!(sut.count(*k), vs.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    // Property: state-machine equivalence with spread-out keys.
    #[test]
    fn prop_state_machine(capacity_log2 in 0u32..=5, ops in arb_ops(arb_key())) {
        run_against_model(capacity_log2, ops)?;
    }

    // Property: same invariants when keys pile into a few long probe chains,
    // which exercises both removal phases and wrap-around.
    #[test]
    fn prop_state_machine_with_collisions(capacity_log2 in 0u32..=5, ops in arb_ops(colliding_key())) {
        run_against_model(capacity_log2, ops)?;
    }
}
