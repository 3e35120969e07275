use super::*;

const T1: TypeHandle = TypeHandle(1);
const T2: TypeHandle = TypeHandle(2);

#[test]
fn test_universe_is_identity() {
    assert_eq!(TypeSet::Universe.restricted_to(TypeSet::Universe), TypeSet::Universe);
    assert_eq!(TypeSet::Universe.restricted_to(TypeSet::Single(T1)), TypeSet::Single(T1));
    assert_eq!(TypeSet::Single(T1).restricted_to(TypeSet::Universe), TypeSet::Single(T1));
    assert_eq!(TypeSet::Universe.restricted_to(TypeSet::Empty), TypeSet::Empty);
}

#[test]
fn test_equal_singletons_are_idempotent() {
    assert_eq!(
        TypeSet::Single(T1).restricted_to(TypeSet::Single(T1)),
        TypeSet::Single(T1)
    );
}

#[test]
fn test_differing_singletons_meet_to_empty() {
    // Never a silent pick: the inconsistency is an explicit marker.
    let met = TypeSet::Single(T1).restricted_to(TypeSet::Single(T2));
    assert_eq!(met, TypeSet::Empty);
    assert!(met.is_unsatisfiable());
}

#[test]
fn test_empty_is_absorbing() {
    assert_eq!(TypeSet::Empty.restricted_to(TypeSet::Single(T1)), TypeSet::Empty);
    assert_eq!(TypeSet::Single(T1).restricted_to(TypeSet::Empty), TypeSet::Empty);
    assert_eq!(TypeSet::Empty.restricted_to(TypeSet::Empty), TypeSet::Empty);
}

#[test]
fn test_meet_is_commutative() {
    let cases = [
        TypeSet::Universe,
        TypeSet::Single(T1),
        TypeSet::Single(T2),
        TypeSet::Empty,
    ];
    for a in cases {
        for b in cases {
            assert_eq!(a.restricted_to(b), b.restricted_to(a));
        }
    }
}

#[test]
fn test_chosen_type() {
    assert_eq!(TypeSet::Single(T1).chosen_type(), Some(T1));
    assert_eq!(TypeSet::Universe.chosen_type(), None);
    assert_eq!(TypeSet::Empty.chosen_type(), None);
}
