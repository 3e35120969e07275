use super::*;

const A: VariableId = VariableId(10);
const B: VariableId = VariableId(11);
const C: VariableId = VariableId(12);
const T1: crate::handles::TypeHandle = crate::handles::TypeHandle(1);
const T2: crate::handles::TypeHandle = crate::handles::TypeHandle(2);

#[test]
fn test_merge_creates_class_of_two() {
    let mut table = EquivalenceTable::new();

    let rep = table.assert_equal(A, B);
    assert_eq!(table.representative_of(A), Some(rep));
    assert_eq!(table.representative_of(B), Some(rep));
    assert_eq!(table.members_of(rep), vec![A, B]);
    assert_eq!(table.participant_count(), 2);
}

#[test]
fn test_unmerged_variable_has_no_representative() {
    let mut table = EquivalenceTable::new();
    table.assert_equal(A, B);
    assert_eq!(table.representative_of(C), None);
    assert_eq!(table.estimate_of(C), None);
}

#[test]
fn test_merge_closure() {
    let mut table = EquivalenceTable::new();

    table.assert_equal(A, B);
    table.assert_equal(B, C);

    let rep = table.representative_of(A).unwrap();
    assert_eq!(table.representative_of(C), Some(rep));
    assert_eq!(table.members_of(rep), vec![A, B, C]);
    assert_eq!(table.classes().len(), 1);
}

#[test]
fn test_merge_closure_is_order_independent() {
    let mut forward = EquivalenceTable::new();
    forward.assert_equal(A, B);
    forward.assert_equal(B, C);

    let mut backward = EquivalenceTable::new();
    backward.assert_equal(B, C);
    backward.assert_equal(A, B);

    let f = forward.representative_of(A).unwrap();
    let b = backward.representative_of(A).unwrap();
    let mut forward_members = forward.members_of(f);
    let mut backward_members = backward.members_of(b);
    forward_members.sort();
    backward_members.sort();
    assert_eq!(forward_members, backward_members);
}

#[test]
fn test_reasserting_shared_class_is_a_no_op() {
    let mut table = EquivalenceTable::new();

    let first = table.assert_equal(A, B);
    let second = table.assert_equal(A, B);
    let third = table.assert_equal(B, A);

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(table.participant_count(), 2);
    assert_eq!(table.classes().len(), 1);
}

#[test]
#[should_panic(expected = "distinct variables")]
fn test_self_merge_is_a_caller_bug() {
    let mut table = EquivalenceTable::new();
    table.assert_equal(A, A);
}

#[test]
fn test_estimate_is_lazily_universe() {
    let mut table = EquivalenceTable::new();
    table.assert_equal(A, B);
    assert_eq!(table.estimate_of(A), Some(TypeSet::Universe));
}

#[test]
fn test_narrow_meets_estimates() {
    let mut table = EquivalenceTable::new();
    table.assert_equal(A, B);

    assert_eq!(table.narrow(A, TypeSet::Single(T1)), Some(TypeSet::Single(T1)));
    // Visible from any member of the class.
    assert_eq!(table.estimate_of(B), Some(TypeSet::Single(T1)));
    // Re-narrowing by the same type is idempotent.
    assert_eq!(table.narrow(B, TypeSet::Single(T1)), Some(TypeSet::Single(T1)));
}

#[test]
fn test_conflicting_narrow_is_unsatisfiable_not_an_error() {
    let mut table = EquivalenceTable::new();
    table.assert_equal(A, B);

    table.narrow(A, TypeSet::Single(T1));
    let estimate = table.narrow(B, TypeSet::Single(T2)).unwrap();
    assert!(estimate.is_unsatisfiable());
    assert_eq!(table.estimate_of(A), Some(TypeSet::Empty));
}

#[test]
fn test_merging_narrowed_classes_meets_their_estimates() {
    let mut table = EquivalenceTable::new();
    let d = VariableId(13);

    table.assert_equal(A, B);
    table.assert_equal(C, d);
    table.narrow(A, TypeSet::Single(T1));
    table.narrow(C, TypeSet::Single(T1));

    table.assert_equal(B, C);
    assert_eq!(table.estimate_of(A), Some(TypeSet::Single(T1)));
    assert_eq!(table.classes().len(), 1);

    // Conflicting estimates collapse the merged class to Empty.
    let mut conflicted = EquivalenceTable::new();
    conflicted.assert_equal(A, B);
    conflicted.assert_equal(C, d);
    conflicted.narrow(A, TypeSet::Single(T1));
    conflicted.narrow(C, TypeSet::Single(T2));
    conflicted.assert_equal(B, C);
    assert_eq!(conflicted.estimate_of(A), Some(TypeSet::Empty));
}

#[test]
fn test_classes_snapshot_members_in_registration_order() {
    let mut table = EquivalenceTable::new();
    let d = VariableId(13);

    table.assert_equal(C, A);
    table.assert_equal(B, d);

    let classes = table.classes();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].members, vec![C, A]);
    assert_eq!(classes[1].members, vec![B, d]);
    for class in &classes {
        assert!(class.members.len() >= 2);
        assert_eq!(class.estimate, TypeSet::Universe);
    }
}
