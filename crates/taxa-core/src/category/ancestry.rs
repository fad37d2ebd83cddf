//! Ancestry maintenance
//!
//! Owns the `ancestors` cache on every category record. `recompute` restores
//! the invariant for one node; `cascade` walks the node's subtree with an
//! explicit worklist so descendants pick up the change. No other module
//! writes `ancestors`.

use crate::error::{Result, TaxaError};

use super::record::CategoryId;
use super::store::CategoryStore;

/// Bookkeeping for one cascade run
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    /// Ids whose cache was rewritten, in visit order
    pub updated: Vec<CategoryId>,
    /// Ids whose branch aborted (their descendants were not visited)
    pub failed: Vec<CategoryId>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Rebuild one node's ancestor cache from its parent's current state
///
/// `ancestors(n) = ancestors(parent(n)) ++ [summary(parent(n))]`, or `[]`
/// for a root. One read and one write on the node, one read on the parent.
pub fn recompute(store: &mut dyn CategoryStore, id: &CategoryId) -> Result<()> {
    let mut node = store.get(id)?.ok_or_else(|| TaxaError::NotFound {
        id: id.to_string(),
    })?;

    let ancestors = match &node.parent_id {
        None => Vec::new(),
        Some(parent_id) => {
            let parent = store
                .get(parent_id)?
                .ok_or_else(|| TaxaError::ParentNotFound {
                    id: parent_id.to_string(),
                })?;
            let summary = parent.summary();
            let mut chain = parent.ancestors;
            chain.push(summary);
            chain
        }
    };

    node.ancestors = ancestors;
    store.put(node)
}

/// Recompute `id` and every descendant reachable when the walk starts
///
/// Iterative worklist, never recursion: the stack holds pending ids and a
/// node is always visited before its children, so each child reads a fresh
/// parent cache. Sibling order is unspecified; every descendant is visited
/// at most once (the tree is acyclic by construction).
///
/// A node that cannot be read, recomputed, or enumerated aborts only its own
/// branch; completed updates elsewhere in the subtree are kept. Any failure
/// turns the run into `TaxaError::PartialCascade` carrying both lists.
pub fn cascade(store: &mut dyn CategoryStore, id: &CategoryId) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    let mut pending: Vec<CategoryId> = vec![id.clone()];

    while let Some(current) = pending.pop() {
        let children = match store.children(&current) {
            Ok(children) => children,
            Err(_) => {
                report.failed.push(current);
                continue;
            }
        };

        match recompute(store, &current) {
            Ok(()) => {
                report.updated.push(current);
                pending.extend(children.into_iter().map(|c| c.id));
            }
            Err(_) => report.failed.push(current),
        }
    }

    if report.is_clean() {
        Ok(report)
    } else {
        Err(TaxaError::PartialCascade {
            updated: report.updated.iter().map(|id| id.to_string()).collect(),
            failed: report.failed.iter().map(|id| id.to_string()).collect(),
        })
    }
}
