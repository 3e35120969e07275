//! Constraint variables: nodes standing for "the type of this program
//! position".
//!
//! One sum type covers the seven variants; identity is the structural
//! [`VariableKey`] canonicalized through the hash-consing store, so equal
//! keys always resolve to the same [`VariableId`]. Mutable associations
//! (used-in index, cached element children, representative membership) live
//! in side maps owned by the model, not in the node.

use bitflags::bitflags;
use generify_common::interner::Atom;
use generify_common::span::Span;

use crate::handles::TypeHandle;

/// Identifier for one source unit fed to the model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

/// Arena index of a canonical constraint variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

impl VariableId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declared visibility of the member a variable belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct VariableFlags: u8 {
        /// Eligible for pruning once its source unit is no longer current.
        const UNIT_SCOPED = 1 << 0;
        /// Pruned; the id remains stable but the variable is gone from all
        /// snapshots.
        const DEAD = 1 << 1;
    }
}

/// Structural identity of a constraint variable.
///
/// Durable program identifiers (declaration keys) give cross-unit identity;
/// range-keyed variants are only meaningful within their unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableKey {
    /// A field or local variable, keyed by its declaration key.
    Variable { decl: Atom },
    /// A method parameter position.
    Parameter { method: Atom, index: u32 },
    /// A method return-type position.
    ReturnType { method: Atom },
    /// A syntactic type reference at a source range.
    SyntacticType { unit: UnitId, span: Span },
    /// A bare type with no source position.
    Plain { ty: TypeHandle },
    /// The synthetic element type of a container-typed parent variable.
    CollectionElement { parent: VariableId, slot: u32 },
    /// The result type of a cast expression.
    Cast { unit: UnitId, span: Span },
}

impl VariableKey {
    /// Variants recording an owning source unit ("declared" capability).
    pub fn is_declared(&self) -> bool {
        matches!(
            self,
            VariableKey::Variable { .. }
                | VariableKey::Parameter { .. }
                | VariableKey::ReturnType { .. }
        )
    }

    pub fn is_element(&self) -> bool {
        matches!(self, VariableKey::CollectionElement { .. })
    }
}

/// Payload of a canonical constraint variable.
#[derive(Clone, Debug)]
pub struct VariableData {
    pub key: VariableKey,
    /// Declared type of the position; `None` for synthetic element variables
    /// whose type is the thing being inferred.
    pub ty: Option<TypeHandle>,
    /// Debug label (declaration or type name).
    pub label: Atom,
    pub flags: VariableFlags,
    /// Owning source unit for declared and range-keyed variants.
    pub unit: Option<UnitId>,
    /// For casts: the variable of the casted expression.
    pub expression: Option<VariableId>,
}

impl VariableData {
    #[inline]
    pub fn is_element(&self) -> bool {
        self.key.is_element()
    }

    #[inline]
    pub fn is_unit_scoped(&self) -> bool {
        self.flags.contains(VariableFlags::UNIT_SCOPED)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.flags.contains(VariableFlags::DEAD)
    }
}

/// A resolved field or local-variable binding, as supplied by the external
/// resolver. `ty` is `None` when the binding could not be resolved; the
/// factories answer with graceful omission in that case.
#[derive(Clone, Debug)]
pub struct VariableBinding<'a> {
    /// Durable declaration key.
    pub key: &'a str,
    pub name: &'a str,
    pub ty: Option<TypeHandle>,
    pub visibility: Visibility,
    /// Local variables never escape their unit.
    pub is_local: bool,
}

/// A resolved method binding for parameter and return-type variables.
#[derive(Clone, Debug)]
pub struct MethodBinding<'a> {
    /// Durable declaration key.
    pub key: &'a str,
    pub name: &'a str,
    pub visibility: Visibility,
    /// Methods of local types never escape their unit.
    pub is_local: bool,
}

impl MethodBinding<'_> {
    /// Narrow scope enables earlier pruning: private and local members can
    /// only be referenced from their own unit.
    pub fn is_unit_scoped(&self) -> bool {
        self.is_local || self.visibility == Visibility::Private
    }
}

impl VariableBinding<'_> {
    pub fn is_unit_scoped(&self) -> bool {
        self.is_local || self.visibility == Visibility::Private
    }
}
