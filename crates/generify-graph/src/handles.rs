//! Structural type handles and the supertype lattice.
//!
//! A `TypeHandle` is a resolver-independent identity for a nominal type.
//! Handles are memoized by the type's declaration key, so two resolver
//! bindings for the same type collapse to one handle and equality is a u32
//! comparison. Each handle carries its direct supertypes, computed once at
//! creation and never mutated; assignability queries walk that lattice.
//!
//! The external parser/resolver is reached only through the narrow
//! [`TypeProvider`] trait. Declaration keys are uninterpreted strings.

use bitflags::bitflags;
use fixedbitset::FixedBitSet;
use generify_common::interner::{Atom, Interner};
use generify_common::limits::{MAX_SUPERTYPE_DEPTH, SUPERS_INLINE_CAPACITY};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// Canonical identity for a nominal type.
///
/// Handles are cheap to copy and compare; two handles are equal exactly when
/// their declaration keys are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

impl TypeHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Properties of a nominal type, supplied by the resolver.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// A primitive type (`int`, `boolean`, ...). Never generifiable.
        const PRIMITIVE = 1 << 0;
        /// The `void` pseudo-type.
        const VOID = 1 << 1;
        /// A container/iterator root the engine infers element types for.
        const CONTAINER_ROOT = 1 << 2;
    }
}

impl TypeFlags {
    /// Types the variable factories reject outright.
    #[inline]
    pub fn is_rejected(self) -> bool {
        self.intersects(TypeFlags::PRIMITIVE | TypeFlags::VOID)
    }
}

/// The narrow interface to the external parser/resolver.
///
/// `Ty` is an opaque resolver-side type reference; the factory only ever
/// copies it and hands it back to the provider. Supertype lists must be
/// acyclic per binding; the same type reached through distinct bindings (and
/// therefore distinct `Ty` values) is collapsed by key.
pub trait TypeProvider {
    /// Opaque resolver-side type reference.
    type Ty: Copy;

    /// Durable declaration key for the type. Uninterpreted by the graph.
    fn key(&self, ty: Self::Ty) -> &str;

    /// Human-readable name, used only for debug labels.
    fn name(&self, ty: Self::Ty) -> &str;

    fn flags(&self, ty: Self::Ty) -> TypeFlags;

    /// Number of type parameters on the type's generic declaration.
    /// Zero for non-generic types.
    fn type_parameter_count(&self, ty: Self::Ty) -> u32;

    /// Direct supertypes: superclass plus interfaces, empty for the
    /// universal root.
    fn direct_supertypes(&self, ty: Self::Ty) -> Vec<Self::Ty>;
}

struct HandleData {
    key: Atom,
    name: Atom,
    flags: TypeFlags,
    type_params: u32,
    supers: SmallVec<[TypeHandle; SUPERS_INLINE_CAPACITY]>,
}

/// Memoizing factory for [`TypeHandle`]s.
///
/// Handles are immutable after creation and reused by id equality.
pub struct TypeHandleFactory {
    memo: FxHashMap<Atom, TypeHandle>,
    handles: Vec<HandleData>,
    container_roots: Vec<TypeHandle>,
}

impl TypeHandleFactory {
    pub fn new() -> Self {
        TypeHandleFactory {
            memo: FxHashMap::default(),
            handles: Vec::new(),
            container_roots: Vec::new(),
        }
    }

    /// Get or create the handle for a resolved type.
    ///
    /// Direct supertype handles are resolved first; because a supertype's
    /// hierarchy may reach this type's key again through a different binding,
    /// the memo is re-checked after recursion before inserting. The
    /// first-inserted handle always wins.
    pub fn get_handle<P: TypeProvider>(
        &mut self,
        interner: &mut Interner,
        provider: &P,
        ty: P::Ty,
    ) -> TypeHandle {
        let key = interner.intern(provider.key(ty));
        if let Some(&handle) = self.memo.get(&key) {
            return handle;
        }

        let supers: SmallVec<[TypeHandle; SUPERS_INLINE_CAPACITY]> = provider
            .direct_supertypes(ty)
            .into_iter()
            .map(|s| self.get_handle(interner, provider, s))
            .collect();

        // Supertype resolution may have inserted this key already.
        if let Some(&handle) = self.memo.get(&key) {
            return handle;
        }

        let handle = TypeHandle(self.handles.len() as u32);
        let name = interner.intern(provider.name(ty));
        let flags = provider.flags(ty);
        self.handles.push(HandleData {
            key,
            name,
            flags,
            type_params: provider.type_parameter_count(ty),
            supers,
        });
        self.memo.insert(key, handle);
        if flags.contains(TypeFlags::CONTAINER_ROOT) {
            self.container_roots.push(handle);
        }
        trace!(handle = handle.0, key = key.0, "created type handle");
        handle
    }

    pub fn key(&self, handle: TypeHandle) -> Atom {
        self.handles[handle.index()].key
    }

    pub fn name(&self, handle: TypeHandle) -> Atom {
        self.handles[handle.index()].name
    }

    pub fn flags(&self, handle: TypeHandle) -> TypeFlags {
        self.handles[handle.index()].flags
    }

    pub fn type_parameter_count(&self, handle: TypeHandle) -> u32 {
        self.handles[handle.index()].type_params
    }

    /// Direct supertypes of the handle, in resolver order.
    pub fn direct_supertypes(&self, handle: TypeHandle) -> &[TypeHandle] {
        &self.handles[handle.index()].supers
    }

    /// Register an additional container root after handle creation, for
    /// resolvers that do not flag roots themselves.
    pub fn mark_container_root(&mut self, handle: TypeHandle) {
        if !self.container_roots.contains(&handle) {
            self.container_roots.push(handle);
        }
    }

    pub fn container_roots(&self) -> &[TypeHandle] {
        &self.container_roots
    }

    /// Reflexive, transitive assignability over direct supertypes.
    pub fn is_assignable_to(&self, sub: TypeHandle, sup: TypeHandle) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = FixedBitSet::with_capacity(self.handles.len());
        let mut worklist: SmallVec<[TypeHandle; 8]> = SmallVec::new();
        visited.insert(sub.index());
        worklist.push(sub);

        let mut steps = 0usize;
        while let Some(current) = worklist.pop() {
            steps += 1;
            if steps > MAX_SUPERTYPE_DEPTH {
                // Broken hierarchy from a partially-resolved unit; give up.
                return false;
            }
            for &parent in self.direct_supertypes(current) {
                if parent == sup {
                    return true;
                }
                if !visited.contains(parent.index()) {
                    visited.insert(parent.index());
                    worklist.push(parent);
                }
            }
        }
        false
    }

    /// Whether the type can hold inferable elements: assignable to any
    /// registered container/iterator root.
    pub fn is_container_like(&self, handle: TypeHandle) -> bool {
        self.container_roots
            .iter()
            .any(|&root| self.is_assignable_to(handle, root))
    }

    /// Number of created handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Default for TypeHandleFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/handles_tests.rs"]
mod tests;
