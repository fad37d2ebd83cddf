//! Tree resolution
//!
//! Read-only lookups over the category store: by id, by bare slug (unique by
//! the slug invariant), or by a full slug path checked against the node's
//! cached ancestor chain. Path resolution is exact-match only, so stale or
//! crafted links fail closed instead of landing on an unrelated node that
//! shares a leaf slug.

use crate::error::{Result, TaxaError};

use super::record::{Category, CategoryId};
use super::store::CategoryStore;

/// Direct lookup by id
pub fn by_id(store: &dyn CategoryStore, id: &CategoryId) -> Result<Category> {
    store.get(id)?.ok_or_else(|| TaxaError::NotFound {
        id: id.to_string(),
    })
}

/// Lookup by bare slug; at most one match exists across the store
pub fn by_slug(store: &dyn CategoryStore, slug: &str) -> Result<Category> {
    store
        .find_by_slug(slug, None)?
        .ok_or_else(|| TaxaError::PathNotFound {
            path: slug.to_string(),
        })
}

/// Lookup by full slug path, leaf last
///
/// The leaf segment must match a node's slug and that node's cached ancestor
/// slugs must equal the preceding segments in length, order, and value.
pub fn by_slug_path(store: &dyn CategoryStore, segments: &[&str]) -> Result<Category> {
    let not_found = || TaxaError::PathNotFound {
        path: segments.join("/"),
    };

    let leaf_slug = match segments.last() {
        Some(leaf) => *leaf,
        None => return Err(not_found()),
    };

    let node = store.find_by_slug(leaf_slug, None)?.ok_or_else(not_found)?;

    let prefix = &segments[..segments.len() - 1];
    let cached = node.ancestor_slugs();
    if cached.len() != prefix.len() || cached.iter().zip(prefix).any(|(a, b)| a != b) {
        return Err(not_found());
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ancestry;
    use crate::category::record::Category;
    use crate::category::store::MemoryCategoryStore;

    fn seed(store: &mut MemoryCategoryStore, name: &str, slug: &str, parent: Option<&CategoryId>) -> CategoryId {
        let record = Category::new(name, slug, parent.cloned());
        let id = record.id.clone();
        store.put(record).unwrap();
        ancestry::recompute(store, &id).unwrap();
        id
    }

    fn sample_tree() -> (MemoryCategoryStore, CategoryId, CategoryId, CategoryId) {
        let mut store = MemoryCategoryStore::new();
        let root = seed(&mut store, "Apparel", "apparel", None);
        let child = seed(&mut store, "T-Shirts", "t-shirts", Some(&root));
        let grandchild = seed(&mut store, "Graphic Tees", "graphic-tees", Some(&child));
        (store, root, child, grandchild)
    }

    #[test]
    fn by_id_hits_and_misses() {
        let (store, root, _, _) = sample_tree();
        assert_eq!(by_id(&store, &root).unwrap().slug, "apparel");

        let err = by_id(&store, &CategoryId::new()).unwrap_err();
        assert!(matches!(err, TaxaError::NotFound { .. }));
    }

    #[test]
    fn by_slug_single_segment() {
        let (store, _, child, _) = sample_tree();
        assert_eq!(by_slug(&store, "t-shirts").unwrap().id, child);
        assert!(by_slug(&store, "tees").is_err());
    }

    #[test]
    fn by_slug_path_exact_match() {
        let (store, _, _, grandchild) = sample_tree();
        let node = by_slug_path(&store, &["apparel", "t-shirts", "graphic-tees"]).unwrap();
        assert_eq!(node.id, grandchild);
    }

    #[test]
    fn by_slug_path_round_trips_every_node() {
        let (store, _, _, _) = sample_tree();
        for record in store.all().unwrap() {
            let mut segments = record.ancestor_slugs();
            segments.push(&record.slug);
            let resolved = by_slug_path(&store, &segments).unwrap();
            assert_eq!(resolved.id, record.id);
        }
    }

    #[test]
    fn by_slug_path_fails_closed() {
        let (store, _, _, _) = sample_tree();

        // Wrong prefix value
        assert!(by_slug_path(&store, &["garden", "t-shirts", "graphic-tees"]).is_err());
        // Wrong length: leaf alone when ancestors exist
        assert!(by_slug_path(&store, &["graphic-tees"]).is_err());
        // Wrong order
        assert!(by_slug_path(&store, &["t-shirts", "apparel", "graphic-tees"]).is_err());
        // Unknown leaf
        assert!(by_slug_path(&store, &["apparel", "t-shirts", "plain-tees"]).is_err());
        // Empty path
        assert!(by_slug_path(&store, &[]).is_err());
    }
}
