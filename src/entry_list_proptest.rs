#![cfg(test)]

// Property tests for EntryList kept inside the crate so they can reach the
// private storage layer.

use crate::entry_list::EntryList;
use crate::same_value_zero::SameValueZero;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;

// Float keys so NaN and signed zeros meet on every run.
const POOL: [f64; 8] = [0.0, -0.0, f64::NAN, 1.0, -1.0, 2.5, f64::INFINITY, 1e-300];

#[derive(Clone, Debug)]
enum Op {
    Upsert(usize, i32),
    InsertAbsent(usize, i32),
    Remove(usize),
    Get(usize),
    Clear,
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let idx = 0..POOL.len();
    let op = prop_oneof![
        4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Upsert(i, v)),
        2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertAbsent(i, v)),
        3 => idx.clone().prop_map(Op::Remove),
        3 => idx.prop_map(Op::Get),
        1 => Just(Op::Clear),
        2 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..80)
}

/// Ordered model: linear scan with SameValueZero.
#[derive(Default)]
struct Model(Vec<(f64, i32)>);

impl Model {
    fn position(&self, k: f64) -> Option<usize> {
        self.0.iter().position(|(kk, _)| kk.same_value_zero(&k))
    }
}

fn run<S: BuildHasher>(
    mut sut: EntryList<f64, i32, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    for op in ops {
        match op {
            Op::Upsert(i, v) => {
                let k = POOL[i];
                let res = sut.upsert(k, v);
                match model.position(k) {
                    Some(p) => {
                        let old = core::mem::replace(&mut model.0[p].1, v);
                        prop_assert_eq!(res, Some(old));
                    }
                    None => {
                        prop_assert_eq!(res, None);
                        model.0.push((k, v));
                    }
                }
            }
            Op::InsertAbsent(i, v) => {
                let k = POOL[i];
                let appended = sut.insert_absent(k, v);
                prop_assert_eq!(appended, model.position(k).is_none());
                if appended {
                    model.0.push((k, v));
                }
            }
            Op::Remove(i) => {
                let k = POOL[i];
                let got = sut.remove(&k);
                match model.position(k) {
                    Some(p) => {
                        let (mk, mv) = model.0.remove(p);
                        let (sk, sv) = got.expect("present in model");
                        prop_assert!(sk.same_value_zero(&mk));
                        prop_assert_eq!(sv, mv);
                    }
                    None => prop_assert!(got.is_none()),
                }
            }
            Op::Get(i) => {
                let k = POOL[i];
                let want = model.position(k).map(|p| &model.0[p].1);
                prop_assert_eq!(sut.get(&k), want);
                prop_assert_eq!(sut.contains(&k), want.is_some());
            }
            Op::Clear => {
                prop_assert_eq!(sut.clear(), model.0.len());
                model.0.clear();
            }
            Op::Iterate => {
                let fwd: Vec<_> = sut.iter().map(|(k, v)| (k.to_bits(), *v)).collect();
                let want: Vec<_> = model.0.iter().map(|(k, v)| (k.to_bits(), *v)).collect();
                prop_assert_eq!(&fwd, &want);
                let mut back: Vec<_> = sut.iter().rev().map(|(k, v)| (k.to_bits(), *v)).collect();
                back.reverse();
                prop_assert_eq!(back, want);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.0.len());
        prop_assert_eq!(sut.is_empty(), model.0.is_empty());
        prop_assert_eq!(sut.iter().len(), model.0.len());
    }
    Ok(())
}

// Property: state-machine equivalence against an ordered Vec model.
// - upsert replaces in place (position and stored key kept) or appends.
// - insert_absent never overwrites.
// - remove keeps the relative order of the survivors.
// - iteration forwards and backwards matches insertion order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        run(EntryList::new(), ops)?;
    }
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants with every key in one bucket, so matching rests
// on SameValueZero alone.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(ops in arb_ops()) {
        run(EntryList::with_hasher(ConstBuildHasher), ops)?;
    }
}
