//! Type constraints: edges between constraint variables.
//!
//! Constraints are canonicalized exactly like variables: the
//! [`ConstraintKind`] is the consing key, so asserting the same edge twice
//! collapses silently to one stored constraint. A caller-supplied
//! [`ConstraintFilter`] is consulted before any allocation to keep edges
//! between uninteresting positions out of the graph entirely.

use crate::handles::TypeHandleFactory;
use crate::variables::{UnitId, VariableData, VariableId};

/// Arena index of a canonical constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u32);

impl ConstraintId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Relationship asserted between the two endpoints of a simple constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintOperator {
    /// left <= right
    Subtype,
    /// left < right
    StrictSubtype,
    /// left == right
    Equals,
}

impl ConstraintOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintOperator::Subtype => "<=",
            ConstraintOperator::StrictSubtype => "<",
            ConstraintOperator::Equals => "==",
        }
    }
}

/// Structural identity of a constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// A binary constraint `left op right`.
    Simple {
        left: VariableId,
        right: VariableId,
        op: ConstraintOperator,
    },
    /// Disjunctive: `left <= right` or `right <= left`, direction unknown.
    EitherSubtype { left: VariableId, right: VariableId },
    /// Ties a container-typed variable to its synthetic element variable.
    ElementLink {
        container: VariableId,
        element: VariableId,
    },
}

impl ConstraintKind {
    /// The two variables this constraint registers against.
    pub fn endpoints(&self) -> (VariableId, VariableId) {
        match *self {
            ConstraintKind::Simple { left, right, .. } => (left, right),
            ConstraintKind::EitherSubtype { left, right } => (left, right),
            ConstraintKind::ElementLink { container, element } => (container, element),
        }
    }
}

/// Payload of a canonical constraint.
#[derive(Clone, Debug)]
pub struct ConstraintData {
    pub kind: ConstraintKind,
    /// Unit current when the constraint was first asserted.
    pub unit: Option<UnitId>,
}

/// Policy hook deciding whether an edge is worth recording.
///
/// Returning false skips the constraint entirely: nothing is allocated and
/// neither endpoint's used-in index changes.
pub trait ConstraintFilter {
    fn retain(
        &self,
        factory: &TypeHandleFactory,
        left: &VariableData,
        right: &VariableData,
        op: ConstraintOperator,
    ) -> bool;
}

/// Default policy: drop edges between two positions whose types are known
/// and not container-like. This deliberately ignores where the type was
/// declared: a non-container endpoint, library or user-defined, can never
/// reach an element position, so the edge cannot affect element inference.
/// Element variables and positions with unresolved types always stay.
pub struct StandardFilter;

impl StandardFilter {
    fn is_interesting(factory: &TypeHandleFactory, var: &VariableData) -> bool {
        if var.is_element() {
            return true;
        }
        match var.ty {
            Some(handle) => factory.is_container_like(handle),
            // Unresolved type: keep the edge, the solver may learn more.
            None => true,
        }
    }
}

impl ConstraintFilter for StandardFilter {
    fn retain(
        &self,
        factory: &TypeHandleFactory,
        left: &VariableData,
        right: &VariableData,
        _op: ConstraintOperator,
    ) -> bool {
        Self::is_interesting(factory, left) || Self::is_interesting(factory, right)
    }
}

/// Policy that records every edge; useful for whole-graph dumps and tests.
pub struct KeepAllFilter;

impl ConstraintFilter for KeepAllFilter {
    fn retain(
        &self,
        _factory: &TypeHandleFactory,
        _left: &VariableData,
        _right: &VariableData,
        _op: ConstraintOperator,
    ) -> bool {
        true
    }
}
