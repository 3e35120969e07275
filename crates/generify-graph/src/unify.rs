//! Equivalence classes over constraint variables using Union-Find.
//!
//! "Equals" edges force two positions to share exactly one type. This module
//! records those merges with the `ena` crate's Union-Find table (path
//! compression, union-by-rank) over dense integer keys, replacing any notion
//! of in-node representative pointers: membership is reconstructed from the
//! table, and the class's lazily-set [`TypeSet`] estimate rides along as the
//! unification value. Merging two estimates meets them, so forcing two
//! incompatible singletons into one class yields `TypeSet::Empty` data on
//! the class rather than an error.

use ena::unify::{InPlaceUnificationTable, NoError, UnifyKey, UnifyValue};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

use crate::type_set::TypeSet;
use crate::variables::VariableId;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Union-find key for one participating variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EquivKey(pub u32);

impl UnifyKey for EquivKey {
    type Value = ClassEstimate;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        EquivKey(u)
    }

    fn tag() -> &'static str {
        "EquivKey"
    }
}

/// Lazily-set type estimate carried on an equivalence class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClassEstimate(pub Option<TypeSet>);

impl UnifyValue for ClassEstimate {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        match (a.0, b.0) {
            (None, None) => Ok(ClassEstimate(None)),
            (Some(set), None) | (None, Some(set)) => Ok(ClassEstimate(Some(set))),
            // Meeting incompatible singletons produces Empty, which is
            // legitimate class data, not a unification failure.
            (Some(a), Some(b)) => Ok(ClassEstimate(Some(a.restricted_to(b)))),
        }
    }
}

/// Identity of a live equivalence class: its current union-find root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepresentativeId(pub u32);

/// Snapshot of one equivalence class.
#[derive(Clone, Debug)]
pub struct EquivalenceClass {
    pub representative: RepresentativeId,
    /// Members in registration order; never fewer than two.
    pub members: Vec<VariableId>,
    pub estimate: TypeSet,
}

/// Union-find structure over the variables forced equal so far.
///
/// Keys are minted lazily when a variable first participates in a merge, so
/// every live class has at least two members by construction. Classes only
/// grow; they are never split.
pub struct EquivalenceTable {
    table: InPlaceUnificationTable<EquivKey>,
    /// Participant registration order, for deterministic snapshots.
    keys: FxIndexMap<VariableId, EquivKey>,
}

impl EquivalenceTable {
    pub fn new() -> Self {
        EquivalenceTable {
            table: InPlaceUnificationTable::new(),
            keys: FxIndexMap::default(),
        }
    }

    fn key_for(&mut self, var: VariableId) -> EquivKey {
        if let Some(&key) = self.keys.get(&var) {
            return key;
        }
        let key = self.table.new_key(ClassEstimate(None));
        self.keys.insert(var, key);
        key
    }

    /// Merge the classes of `a` and `b`, creating them as needed.
    ///
    /// Re-asserting an equality between two variables that already share a
    /// representative returns it unchanged.
    pub fn assert_equal(&mut self, a: VariableId, b: VariableId) -> RepresentativeId {
        assert!(a != b, "assert_equal requires two distinct variables");

        let key_a = self.key_for(a);
        let key_b = self.key_for(b);

        let root_a = self.table.find(key_a);
        let root_b = self.table.find(key_b);
        if root_a == root_b {
            return RepresentativeId(root_a.0);
        }

        self.table.union(key_a, key_b);
        let root = self.table.find(key_a);
        trace!(a = a.0, b = b.0, root = root.0, "merged equivalence classes");
        RepresentativeId(root.0)
    }

    /// The representative of `var`'s class, if it participates in one.
    pub fn representative_of(&mut self, var: VariableId) -> Option<RepresentativeId> {
        let key = *self.keys.get(&var)?;
        Some(RepresentativeId(self.table.find(key).0))
    }

    /// Current estimate of `var`'s class; `Universe` when lazily unset.
    pub fn estimate_of(&mut self, var: VariableId) -> Option<TypeSet> {
        let key = *self.keys.get(&var)?;
        Some(self.table.probe_value(key).0.unwrap_or(TypeSet::Universe))
    }

    /// Narrow the estimate of `var`'s class by meeting it with `set`.
    /// Returns the class's new estimate, or `None` if `var` has no class.
    pub fn narrow(&mut self, var: VariableId, set: TypeSet) -> Option<TypeSet> {
        let key = *self.keys.get(&var)?;
        self.table.union_value(key, ClassEstimate(Some(set)));
        Some(self.table.probe_value(key).0.unwrap_or(TypeSet::Universe))
    }

    /// Members of the class containing `rep`, in registration order.
    pub fn members_of(&mut self, rep: RepresentativeId) -> Vec<VariableId> {
        let root = self.table.find(EquivKey(rep.0));
        let participants: Vec<(VariableId, EquivKey)> =
            self.keys.iter().map(|(&v, &k)| (v, k)).collect();
        participants
            .into_iter()
            .filter(|&(_, key)| self.table.find(key) == root)
            .map(|(var, _)| var)
            .collect()
    }

    /// Snapshot of every live equivalence class.
    pub fn classes(&mut self) -> Vec<EquivalenceClass> {
        let participants: Vec<(VariableId, EquivKey)> =
            self.keys.iter().map(|(&v, &k)| (v, k)).collect();

        let mut grouped: FxIndexMap<EquivKey, Vec<VariableId>> = FxIndexMap::default();
        for (var, key) in participants {
            let root = self.table.find(key);
            grouped.entry(root).or_default().push(var);
        }

        grouped
            .into_iter()
            .map(|(root, members)| {
                let estimate = self.table.probe_value(root).0.unwrap_or(TypeSet::Universe);
                EquivalenceClass {
                    representative: RepresentativeId(root.0),
                    members,
                    estimate,
                }
            })
            .collect()
    }

    /// Number of variables participating in any class.
    pub fn participant_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for EquivalenceTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/unify_tests.rs"]
mod tests;
