//! Type-set lattice for narrowing equivalence-class estimates.
//!
//! A `TypeSet` is the current best estimate of which type an equivalence
//! class may take. The lattice has three points: `Universe` (top, matches
//! anything), a single concrete type, and `Empty` (bottom, unsatisfiable).
//! `Empty` is a legitimate outcome for non-generifiable code, not an error:
//! the downstream refactoring skips that container instead of aborting.

use crate::handles::TypeHandle;

/// Lattice value for an equivalence class's type estimate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSet {
    /// Top: no information yet, any type is still possible.
    Universe,
    /// Exactly one concrete type remains.
    Single(TypeHandle),
    /// Bottom: two incompatible singletons were forced together.
    Empty,
}

impl TypeSet {
    /// Meet of two estimates.
    ///
    /// `Universe` is the identity, `Empty` is absorbing, and two differing
    /// singletons meet to `Empty` rather than silently picking one.
    #[must_use]
    pub fn restricted_to(self, other: TypeSet) -> TypeSet {
        match (self, other) {
            (TypeSet::Universe, x) | (x, TypeSet::Universe) => x,
            (TypeSet::Empty, _) | (_, TypeSet::Empty) => TypeSet::Empty,
            (TypeSet::Single(a), TypeSet::Single(b)) => {
                if a == b {
                    TypeSet::Single(a)
                } else {
                    TypeSet::Empty
                }
            }
        }
    }

    /// Whether the estimate has collapsed to the unsatisfiable marker.
    #[inline]
    pub fn is_unsatisfiable(self) -> bool {
        matches!(self, TypeSet::Empty)
    }

    /// The single remaining type, if the estimate has narrowed to one.
    #[inline]
    pub fn chosen_type(self) -> Option<TypeHandle> {
        match self {
            TypeSet::Single(handle) => Some(handle),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/type_set_tests.rs"]
mod tests;
