// tests/index_properties.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use proptest::prelude::*;
use prefab_index::index::ScriptIndex;
use prefab_index::types::ScriptSet;

#[derive(Debug, Clone)]
enum Op {
    Record(usize, ScriptSet),
    Remove(usize),
}

const CONTAINERS: usize = 6;

fn container(i: usize) -> PathBuf {
    PathBuf::from(format!("/proj/Assets/C{i}.prefab"))
}

// Small id alphabet so containers share scripts often.
fn script_set() -> impl Strategy<Value = ScriptSet> {
    proptest::collection::btree_set(
        prop_oneof![Just("A"), Just("B"), Just("C"), Just("D"), Just("E")].prop_map(String::from),
        0..4,
    )
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..CONTAINERS, script_set()).prop_map(|(c, s)| Op::Record(c, s)),
        1 => (0..CONTAINERS).prop_map(Op::Remove),
    ]
}

fn apply(index: &mut ScriptIndex, op: &Op) {
    match op {
        Op::Record(c, scripts) => {
            index.record_container(&container(*c), scripts.clone());
        }
        Op::Remove(c) => {
            index.remove_container(&container(*c));
        }
    }
}

proptest! {
    #[test]
    fn forward_and_reverse_stay_inverse(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let mut index = ScriptIndex::new();
        for op in &ops {
            apply(&mut index, op);
            prop_assert_eq!(index.verify(), Ok(()));
        }
    }

    #[test]
    fn index_matches_last_write_per_container(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let mut index = ScriptIndex::new();
        let mut model: Vec<ScriptSet> = vec![BTreeSet::new(); CONTAINERS];

        for op in &ops {
            apply(&mut index, op);
            match op {
                Op::Record(c, s) => model[*c] = s.clone(),
                Op::Remove(c) => model[*c].clear(),
            }
        }

        for (i, expected) in model.iter().enumerate() {
            let actual = index.scripts_of(&container(i)).cloned().unwrap_or_default();
            prop_assert_eq!(&actual, expected);
            for script in expected {
                prop_assert!(index.lookup(script).contains(&container(i)));
            }
        }
    }

    #[test]
    fn recording_twice_equals_recording_once(
        ops in proptest::collection::vec(op_strategy(), 0..30),
        target in 0..CONTAINERS,
        scripts in script_set(),
    ) {
        let mut once = ScriptIndex::new();
        for op in &ops {
            apply(&mut once, op);
        }
        once.record_container(&container(target), scripts.clone());

        let mut twice = once.clone();
        twice.record_container(&container(target), scripts);

        prop_assert_eq!(once, twice);
    }
}

#[test]
fn round_trip_moves_reference_between_scripts() {
    let mut index = ScriptIndex::new();
    let p = container(0);
    let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<ScriptSet>();

    index.record_container(&p, set(&["A", "B"]));
    index.record_container(&p, set(&["B", "C"]));

    assert!(!index.lookup("A").contains(&p));
    assert!(index.lookup("B").contains(&p));
    assert!(index.lookup("C").contains(&p));
}

#[test]
fn delete_then_lookup_is_empty() {
    let mut index = ScriptIndex::new();
    let p = container(1);
    index.record_container(&p, ["A".to_string()].into());
    index.remove_container(&p);
    assert!(index.lookup("A").is_empty());
}
