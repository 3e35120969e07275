//! Centralized limits and thresholds for the generify engine.
//!
//! This module provides shared constants for walk depths and capacity limits
//! used throughout the codebase. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Makes it easy to tune limits for different workloads
//! - Documents the rationale for each limit

// =============================================================================
// Walk Depth Limits
// =============================================================================

/// Maximum depth for supertype-lattice walks.
///
/// A well-formed type hierarchy is acyclic, but handles are built from
/// resolver-supplied supertype lists and a broken unit can hand the factory a
/// cyclic hierarchy. The assignability walk carries a visited set, so this
/// bound only caps pathological chains.
pub const MAX_SUPERTYPE_DEPTH: usize = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Inline capacity of a constraint variable's used-in index.
///
/// Most variables participate in exactly one constraint; the index stores a
/// single entry inline and spills to the heap on the second registration.
pub const USED_IN_INLINE_CAPACITY: usize = 1;

/// Inline capacity of a type handle's direct-supertype list.
///
/// Almost every nominal type has a superclass plus at most one interface.
pub const SUPERS_INLINE_CAPACITY: usize = 2;

/// Pre-allocation size for the per-model variable arena.
///
/// A typical source unit contributes a few dozen constraint variables; this
/// covers small batches without rehashing.
pub const VARIABLE_ARENA_CAPACITY: usize = 128;
