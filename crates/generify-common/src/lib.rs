//! Common types and utilities for the generify refactoring engine.
//!
//! This crate provides foundational types used across all generify crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Centralized limits and thresholds

// String interning for declaration-key and type-name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets within one source unit)
pub mod span;
pub use span::{Span, Spanned};

// Centralized limits and thresholds
pub mod limits;
