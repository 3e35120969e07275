//! Type constraint graph for raw-container generification.
//!
//! This crate builds a global constraint graph over a program's variables,
//! parameters, return types, and container-element positions, so a
//! downstream solver can decide which raw container usages can be soundly
//! rewritten with a concrete generic type argument. It uses:
//!
//! - **Hash-consing**: constraint variables and constraints are canonicalized
//!   by structural key, so graph identity is a u32 comparison
//! - **Ena**: Union-Find (path compression, union-by-rank) over the
//!   positions forced to share exactly one type
//! - **A type-set lattice**: `Universe` / single type / unsatisfiable, met
//!   via `restricted_to` as classes are narrowed
//!
//! Parsing, symbol resolution, and change generation are external
//! collaborators; they reach this crate only through [`TypeProvider`] and
//! opaque declaration-key strings.
mod constraints;
mod handles;
mod intern;
mod model;
mod type_set;
mod unify;
mod variables;

pub use constraints::{
    ConstraintData, ConstraintFilter, ConstraintId, ConstraintKind, ConstraintOperator,
    KeepAllFilter, StandardFilter,
};
pub use handles::{TypeFlags, TypeHandle, TypeHandleFactory, TypeProvider};
pub use intern::ConsTable;
pub use model::ConstraintModel;
pub use type_set::TypeSet;
pub use unify::{ClassEstimate, EquivKey, EquivalenceClass, EquivalenceTable, RepresentativeId};
pub use variables::{
    MethodBinding, UnitId, VariableBinding, VariableData, VariableFlags, VariableId, VariableKey,
    Visibility,
};
