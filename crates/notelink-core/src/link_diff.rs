//! Declarative set sync for outgoing edges.
//!
//! Reconciliation computes the edge set a note *should* have and diffs it
//! against what the store holds. Both steps are pure and storage-agnostic.

use std::collections::HashSet;
use uuid::Uuid;

/// Edges to add and remove to turn `current` into `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDiff {
    /// Desired targets missing from the current set, in `desired` order.
    pub to_add: Vec<Uuid>,
    /// Current targets absent from the desired set, in `current` order.
    pub to_remove: Vec<Uuid>,
}

impl LinkDiff {
    /// True when the current set already matches.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff two target-id sets.
///
/// Duplicates in either input are collapsed.
pub fn diff_links(current: &[Uuid], desired: &[Uuid]) -> LinkDiff {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let desired_set: HashSet<Uuid> = desired.iter().copied().collect();

    let mut added = HashSet::new();
    let to_add = desired
        .iter()
        .copied()
        .filter(|id| !current_set.contains(id) && added.insert(*id))
        .collect();

    let mut removed = HashSet::new();
    let to_remove = current
        .iter()
        .copied()
        .filter(|id| !desired_set.contains(id) && removed.insert(*id))
        .collect();

    LinkDiff { to_add, to_remove }
}

/// Build the desired target set for `source` from resolved note ids.
///
/// Drops self references and collapses titles that resolved to the same
/// note, keeping first-occurrence order.
pub fn desired_targets(source: Uuid, resolved: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    resolved
        .iter()
        .copied()
        .filter(|id| *id != source && seen.insert(*id))
        .collect()
}
