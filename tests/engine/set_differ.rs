//! Integration tests for the generic set differ

use std::collections::BTreeSet;

use chunkwatch_engine::SetDiffer;

fn set<T: Ord + Clone>(v: &[T]) -> BTreeSet<T> {
    v.iter().cloned().collect()
}

#[test]
fn string_keys() {
    let mut differ = SetDiffer::new();
    differ.diff(["Player", "Enemy", "Camera"].map(String::from));
    let changes = differ.diff(["Player", "Camera", "Light"].map(String::from));

    assert_eq!(set(&changes.added), set(&["Light".to_string()]));
    assert_eq!(set(&changes.removed), set(&["Enemy".to_string()]));
}

#[test]
fn order_of_input_is_irrelevant() {
    let mut forward = SetDiffer::new();
    let mut backward = SetDiffer::new();
    let values: Vec<u64> = (0..500).map(|i| i * 7919 % 1009).collect();
    let mut reversed = values.clone();
    reversed.reverse();

    assert_eq!(set(&forward.diff(values.clone()).added), set(&backward.diff(reversed).added));

    let next: Vec<u64> = values.iter().map(|v| v + 3).collect();
    let mut next_rev = next.clone();
    next_rev.reverse();
    let a = forward.diff(next);
    let b = backward.diff(next_rev);
    assert_eq!(set(&a.added), set(&b.added));
    assert_eq!(set(&a.removed), set(&b.removed));
}

#[test]
fn identical_snapshots_are_quiet() {
    let mut differ = SetDiffer::new();
    differ.diff(0..100);
    for _ in 0..3 {
        assert!(differ.diff(0..100).is_empty());
    }
}
