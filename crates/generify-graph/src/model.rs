//! Constraint model orchestration.
//!
//! `ConstraintModel` is the surface an external source-unit visitor drives:
//! it creates and canonicalizes constraint variables and constraints,
//! applies the filtering policy, manages per-unit scoping and pruning, and
//! exposes the resulting graph to the downstream solver.
//!
//! Construction is single-threaded and synchronous: one visitor walks one
//! source unit at a time. The only resource concern is heap growth across
//! many units, bounded by the pruning step at each `new_unit` boundary.

use generify_common::interner::{Atom, Interner};
use generify_common::limits::{USED_IN_INLINE_CAPACITY, VARIABLE_ARENA_CAPACITY};
use generify_common::span::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constraints::{
    ConstraintData, ConstraintFilter, ConstraintId, ConstraintKind, ConstraintOperator,
    StandardFilter,
};
use crate::handles::{TypeHandle, TypeHandleFactory, TypeProvider};
use crate::intern::ConsTable;
use crate::type_set::TypeSet;
use crate::unify::{EquivalenceClass, EquivalenceTable, RepresentativeId};
use crate::variables::{
    MethodBinding, UnitId, VariableBinding, VariableData, VariableFlags, VariableId, VariableKey,
};

type UsedInList = SmallVec<[ConstraintId; USED_IN_INLINE_CAPACITY]>;

/// The global constraint graph over one analysis run.
///
/// Owns all state explicitly; nothing here is process-wide. One model
/// instance per run, accessed from one thread.
pub struct ConstraintModel<F = StandardFilter> {
    interner: Interner,
    factory: TypeHandleFactory,

    variables: Vec<VariableData>,
    variable_table: ConsTable<VariableKey, VariableId>,
    constraints: Vec<ConstraintData>,
    constraint_table: ConsTable<ConstraintKind, ConstraintId>,

    /// Side index: every constraint a variable appears in. Inline single
    /// entry, spilled to the heap on the second registration.
    used_in: FxHashMap<VariableId, UsedInList>,
    /// Cached synthetic element variables, one per (parent, slot).
    element_children: FxHashMap<(VariableId, u32), VariableId>,
    /// Parents that own at least one cached element child.
    parents_with_children: FxHashSet<VariableId>,
    /// Expression variables a cast variable points back at; they must stay
    /// live as long as the cast's back-reference can be followed.
    cast_referents: FxHashSet<VariableId>,

    equivalence: EquivalenceTable,
    filter: F,
    current_unit: Option<UnitId>,
}

impl ConstraintModel<StandardFilter> {
    pub fn new() -> Self {
        Self::with_filter(StandardFilter)
    }
}

impl Default for ConstraintModel<StandardFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ConstraintFilter> ConstraintModel<F> {
    pub fn with_filter(filter: F) -> Self {
        let mut interner = Interner::new();
        interner.intern_common();
        ConstraintModel {
            interner,
            factory: TypeHandleFactory::new(),
            variables: Vec::with_capacity(VARIABLE_ARENA_CAPACITY),
            variable_table: ConsTable::new(),
            constraints: Vec::new(),
            constraint_table: ConsTable::new(),
            used_in: FxHashMap::default(),
            element_children: FxHashMap::default(),
            parents_with_children: FxHashSet::default(),
            cast_referents: FxHashSet::default(),
            equivalence: EquivalenceTable::new(),
            filter,
            current_unit: None,
        }
    }

    // =========================================================================
    // Type handles
    // =========================================================================

    /// Get or create the handle for a resolver-supplied type.
    pub fn handle_for<P: TypeProvider>(&mut self, provider: &P, ty: P::Ty) -> TypeHandle {
        self.factory.get_handle(&mut self.interner, provider, ty)
    }

    pub fn factory(&self) -> &TypeHandleFactory {
        &self.factory
    }

    /// Register a container/iterator root whose element types the engine
    /// should infer.
    pub fn mark_container_root(&mut self, handle: TypeHandle) {
        self.factory.mark_container_root(handle);
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    // =========================================================================
    // Unit boundaries and pruning
    // =========================================================================

    /// Begin a new source unit.
    ///
    /// Prunes prior-unit unit-scoped variables that gathered no usages, no
    /// element child, and no cast back-reference, then resets the
    /// created-this-unit accumulators the incremental solver consumes.
    pub fn new_unit(&mut self, unit: UnitId) {
        let previous = self.current_unit.take();
        if previous.is_some() {
            let created: Vec<VariableId> = self.variable_table.created_this_unit().to_vec();
            let mut pruned = 0usize;
            for id in created {
                if !self.is_prunable(id, previous) {
                    continue;
                }
                let data = &mut self.variables[id.index()];
                data.flags.insert(VariableFlags::DEAD);
                let key = data.key;
                self.variable_table.remove(&key);
                self.used_in.remove(&id);
                pruned += 1;
            }
            if pruned > 0 {
                debug!(pruned, "pruned unit-scoped variables at unit boundary");
            }
        }
        self.variable_table.reset_unit();
        self.constraint_table.reset_unit();
        self.current_unit = Some(unit);
    }

    fn is_prunable(&self, id: VariableId, previous: Option<UnitId>) -> bool {
        let data = &self.variables[id.index()];
        data.is_unit_scoped()
            && !data.is_dead()
            && data.unit == previous
            && self.used_in.get(&id).is_none_or(|list| list.is_empty())
            && !self.parents_with_children.contains(&id)
            && !self.cast_referents.contains(&id)
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.current_unit
    }

    fn require_unit(&self) -> UnitId {
        self.current_unit
            .unwrap_or_else(|| panic!("no current source unit; call new_unit first"))
    }

    // =========================================================================
    // Variable factories
    // =========================================================================

    /// True when the type survives the primitive/void filter.
    fn passes_type_filter(&self, ty: TypeHandle) -> bool {
        !self.factory.flags(ty).is_rejected()
    }

    fn alloc_variable(
        &mut self,
        key: VariableKey,
        ty: Option<TypeHandle>,
        label: Atom,
        flags: VariableFlags,
        unit: Option<UnitId>,
        expression: Option<VariableId>,
    ) -> VariableId {
        let variables = &mut self.variables;
        let (id, inserted) = self.variable_table.stored_or_insert(key, || {
            let id = VariableId(variables.len() as u32);
            variables.push(VariableData {
                key,
                ty,
                label,
                flags,
                unit,
                expression,
            });
            id
        });
        if inserted {
            trace!(id = id.0, ?key, "created constraint variable");
        }
        id
    }

    /// Variable for a field or local-variable declaration.
    ///
    /// Returns `None` for unresolved bindings and primitive/void types; one
    /// broken unit must not abort the batch.
    pub fn make_variable_variable(&mut self, binding: &VariableBinding) -> Option<VariableId> {
        let ty = binding.ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        let unit = self.require_unit();
        let key = VariableKey::Variable {
            decl: self.interner.intern(binding.key),
        };
        let label = self.interner.intern(binding.name);
        let mut flags = VariableFlags::empty();
        if binding.is_unit_scoped() {
            flags.insert(VariableFlags::UNIT_SCOPED);
        }
        Some(self.alloc_variable(key, Some(ty), label, flags, Some(unit), None))
    }

    /// Variable for one parameter position of a method.
    pub fn make_parameter_type_variable(
        &mut self,
        method: &MethodBinding,
        index: u32,
        ty: Option<TypeHandle>,
    ) -> Option<VariableId> {
        let ty = ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        let unit = self.require_unit();
        let key = VariableKey::Parameter {
            method: self.interner.intern(method.key),
            index,
        };
        let label = self.interner.intern(method.name);
        let mut flags = VariableFlags::empty();
        if method.is_unit_scoped() {
            flags.insert(VariableFlags::UNIT_SCOPED);
        }
        Some(self.alloc_variable(key, Some(ty), label, flags, Some(unit), None))
    }

    /// Variable for a method's return-type position.
    pub fn make_return_type_variable(
        &mut self,
        method: &MethodBinding,
        ty: Option<TypeHandle>,
    ) -> Option<VariableId> {
        let ty = ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        let unit = self.require_unit();
        let key = VariableKey::ReturnType {
            method: self.interner.intern(method.key),
        };
        let label = self.interner.intern(method.name);
        let mut flags = VariableFlags::empty();
        if method.is_unit_scoped() {
            flags.insert(VariableFlags::UNIT_SCOPED);
        }
        Some(self.alloc_variable(key, Some(ty), label, flags, Some(unit), None))
    }

    /// Variable for a syntactic type reference at a source range.
    /// Range-keyed, so always unit-scoped.
    pub fn make_type_variable(&mut self, span: Span, ty: Option<TypeHandle>) -> Option<VariableId> {
        let ty = ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        let unit = self.require_unit();
        let key = VariableKey::SyntacticType { unit, span };
        let label = self.factory.name(ty);
        Some(self.alloc_variable(
            key,
            Some(ty),
            label,
            VariableFlags::UNIT_SCOPED,
            Some(unit),
            None,
        ))
    }

    /// Variable for a bare type with no source position. Durable.
    pub fn make_plain_type_variable(&mut self, ty: Option<TypeHandle>) -> Option<VariableId> {
        let ty = ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        let key = VariableKey::Plain { ty };
        let label = self.factory.name(ty);
        Some(self.alloc_variable(key, Some(ty), label, VariableFlags::empty(), None, None))
    }

    /// Variable for the result type of a cast expression, referencing the
    /// casted expression's variable. Range-keyed, so always unit-scoped.
    pub fn make_cast_variable(
        &mut self,
        span: Span,
        ty: Option<TypeHandle>,
        expression: VariableId,
    ) -> Option<VariableId> {
        let ty = ty?;
        if !self.passes_type_filter(ty) {
            return None;
        }
        self.check_live(expression);
        let unit = self.require_unit();
        let key = VariableKey::Cast { unit, span };
        let label = self.factory.name(ty);
        // The back-reference keeps the expression variable out of pruning.
        self.cast_referents.insert(expression);
        Some(self.alloc_variable(
            key,
            Some(ty),
            label,
            VariableFlags::UNIT_SCOPED,
            Some(unit),
            Some(expression),
        ))
    }

    // =========================================================================
    // Element variables
    // =========================================================================

    /// The element variable of a single-parameter container position.
    pub fn element_variable_of(&mut self, parent: VariableId) -> Option<VariableId> {
        self.element_variable_with_slot(parent, 0)
    }

    /// The element variable for one type-parameter slot of a container
    /// position (slot 1 is the value slot of a map-like container).
    ///
    /// Returns `None` unless the parent's type is assignable to a registered
    /// container root. The child is created at most once per (parent, slot);
    /// repeated requests return the cached instance. First creation also
    /// records the link constraint tying container to element.
    pub fn element_variable_with_slot(
        &mut self,
        parent: VariableId,
        slot: u32,
    ) -> Option<VariableId> {
        self.check_live(parent);
        let data = &self.variables[parent.index()];
        let ty = data.ty?;
        if !self.factory.is_container_like(ty) {
            return None;
        }
        // Raw pre-generics hierarchies may not expose a parameter count;
        // container-like types always have at least the element slot.
        let arity = self.factory.type_parameter_count(ty).max(1);
        assert!(
            slot < arity,
            "element slot {slot} is not a type parameter of the container (arity {arity})"
        );

        if let Some(&child) = self.element_children.get(&(parent, slot)) {
            return Some(child);
        }

        let parent_label = self.interner.resolve(data.label).to_string();
        let label = self.interner.intern_owned(format!("Elem[{parent_label}]"));
        let key = VariableKey::CollectionElement { parent, slot };
        let child = self.alloc_variable(key, None, label, VariableFlags::empty(), None, None);

        self.element_children.insert((parent, slot), child);
        self.parents_with_children.insert(parent);
        self.record_constraint(ConstraintKind::ElementLink {
            container: parent,
            element: child,
        });
        trace!(parent = parent.0, slot, child = child.0, "created element variable");
        Some(child)
    }

    /// The cached element child for (parent, slot), without creating one.
    pub fn cached_element_variable(&self, parent: VariableId, slot: u32) -> Option<VariableId> {
        self.element_children.get(&(parent, slot)).copied()
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    fn check_live(&self, id: VariableId) {
        assert!(
            !self.variables[id.index()].is_dead(),
            "constraint variable {} was pruned at a unit boundary",
            id.0
        );
    }

    /// Store a canonical constraint and index it on both endpoints.
    /// Duplicate assertions collapse to the first-stored edge.
    fn record_constraint(&mut self, kind: ConstraintKind) -> ConstraintId {
        let unit = self.current_unit;
        let constraints = &mut self.constraints;
        let (id, inserted) = self.constraint_table.stored_or_insert(kind, || {
            let id = ConstraintId(constraints.len() as u32);
            constraints.push(ConstraintData { kind, unit });
            id
        });
        if inserted {
            let (left, right) = kind.endpoints();
            self.index_usage(left, id);
            if right != left {
                self.index_usage(right, id);
            }
        }
        id
    }

    fn index_usage(&mut self, var: VariableId, constraint: ConstraintId) {
        let list = self.used_in.entry(var).or_default();
        if !list.contains(&constraint) {
            list.push(constraint);
        }
    }

    /// Create (or reuse) a binary constraint between two canonical variables.
    ///
    /// The filter predicate runs first; a skipped edge performs no
    /// allocation or registration and yields `None`. An `Equals` edge merges
    /// the endpoints' element positions into one equivalence class.
    pub fn create_constraint(
        &mut self,
        left: VariableId,
        right: VariableId,
        op: ConstraintOperator,
    ) -> Option<ConstraintId> {
        self.check_live(left);
        self.check_live(right);
        if !self.filter.retain(
            &self.factory,
            &self.variables[left.index()],
            &self.variables[right.index()],
            op,
        ) {
            trace!(left = left.0, right = right.0, op = op.as_str(), "filtered constraint");
            return None;
        }

        let id = self.record_constraint(ConstraintKind::Simple { left, right, op });
        if op == ConstraintOperator::Equals {
            self.merge_equal_positions(left, right);
        }
        Some(id)
    }

    /// Disjunctive constraint: one of the two subtype directions holds.
    pub fn create_either_subtype_constraint(
        &mut self,
        left: VariableId,
        right: VariableId,
    ) -> Option<ConstraintId> {
        self.check_live(left);
        self.check_live(right);
        if !self.filter.retain(
            &self.factory,
            &self.variables[left.index()],
            &self.variables[right.index()],
            ConstraintOperator::Subtype,
        ) {
            return None;
        }
        Some(self.record_constraint(ConstraintKind::EitherSubtype { left, right }))
    }

    /// Merge two positions forced to share exactly one element type.
    ///
    /// Element variables merge directly; container-typed positions merge
    /// through their (created-on-demand) element variables.
    fn merge_equal_positions(&mut self, left: VariableId, right: VariableId) {
        let left_elem = self.element_position(left);
        let right_elem = self.element_position(right);
        if let (Some(a), Some(b)) = (left_elem, right_elem) {
            if a != b {
                self.equivalence.assert_equal(a, b);
            }
        }
    }

    fn element_position(&mut self, var: VariableId) -> Option<VariableId> {
        if self.variables[var.index()].is_element() {
            Some(var)
        } else {
            self.element_variable_of(var)
        }
    }

    /// Merge the classes of two element variables directly.
    pub fn assert_equal(&mut self, a: VariableId, b: VariableId) -> RepresentativeId {
        self.check_live(a);
        self.check_live(b);
        self.equivalence.assert_equal(a, b)
    }

    // =========================================================================
    // Read accessors (snapshots for the external solver)
    // =========================================================================

    pub fn variable(&self, id: VariableId) -> &VariableData {
        &self.variables[id.index()]
    }

    pub fn constraint(&self, id: ConstraintId) -> &ConstraintData {
        &self.constraints[id.index()]
    }

    /// All live variables, in creation order.
    pub fn all_variables(&self) -> Vec<VariableId> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, data)| !data.is_dead())
            .map(|(i, _)| VariableId(i as u32))
            .collect()
    }

    /// All stored constraints, in creation order.
    pub fn all_constraints(&self) -> Vec<ConstraintId> {
        (0..self.constraints.len() as u32).map(ConstraintId).collect()
    }

    /// Constraints a variable appears in.
    pub fn constraints_using(&self, var: VariableId) -> &[ConstraintId] {
        self.used_in.get(&var).map(|list| list.as_slice()).unwrap_or(&[])
    }

    /// Variables created since the last unit boundary.
    pub fn new_variables_this_unit(&self) -> &[VariableId] {
        self.variable_table.created_this_unit()
    }

    /// Constraints created since the last unit boundary.
    pub fn new_constraints_this_unit(&self) -> &[ConstraintId] {
        self.constraint_table.created_this_unit()
    }

    /// Snapshot of every live equivalence class.
    pub fn equivalence_classes(&mut self) -> Vec<EquivalenceClass> {
        self.equivalence.classes()
    }

    pub fn representative_of(&mut self, var: VariableId) -> Option<RepresentativeId> {
        self.equivalence.representative_of(var)
    }

    /// Current estimate of `var`'s class; `None` if it is in no class.
    pub fn estimate_of(&mut self, var: VariableId) -> Option<TypeSet> {
        self.equivalence.estimate_of(var)
    }

    /// Narrow the estimate of `var`'s class by meeting it with `set`.
    /// Returns the new estimate, which is `TypeSet::Empty` when the class
    /// has become unsatisfiable.
    pub fn narrow_estimate(&mut self, var: VariableId, set: TypeSet) -> Option<TypeSet> {
        self.equivalence.narrow(var, set)
    }

    /// Number of live variables.
    pub fn variable_count(&self) -> usize {
        self.variable_table.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
