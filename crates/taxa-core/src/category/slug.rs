//! Slug allocation
//!
//! Turns display names into globally unique URL-safe slugs. Derived slugs
//! probe the store and take a numeric suffix on collision; explicit slugs are
//! an intent signal and fail with a conflict instead of being rewritten.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, TaxaError};

use super::record::CategoryId;
use super::store::CategoryStore;

/// Fallback base when normalization consumes the whole input
pub const DEFAULT_PLACEHOLDER: &str = "category";

/// Normalize a display name into slug form
///
/// Lowercases, strips diacritics (NFD + combining-mark filter), collapses
/// every run outside `[a-z0-9]` into a single interior hyphen, and trims
/// edge hyphens. May return an empty string; callers supply the fallback.
pub fn normalize(input: &str) -> String {
    let folded: String = input.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut out = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Check that a slug is already in canonical kebab-case form
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Allocate a unique slug derived from a display name
///
/// Probes `base`, then `base-1`, `base-2`, … until the store reports the
/// candidate free. Terminates because probes increase monotonically and the
/// store is finite. `exclude` skips the node being renamed.
pub fn allocate(
    store: &dyn CategoryStore,
    desired: &str,
    fallback: &str,
    exclude: Option<&CategoryId>,
) -> Result<String> {
    let normalized = normalize(desired);
    let base = if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized
    };

    if store.find_by_slug(&base, exclude)?.is_none() {
        return Ok(base);
    }

    let mut n: u64 = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if store.find_by_slug(&candidate, exclude)?.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// Claim an explicitly requested slug
///
/// No rewriting: an invalid slug is a validation failure and a taken slug is
/// a conflict.
pub fn claim(
    store: &dyn CategoryStore,
    explicit: &str,
    exclude: Option<&CategoryId>,
) -> Result<String> {
    if !is_valid(explicit) {
        return Err(TaxaError::validation(format!(
            "slug must be non-empty lowercase kebab-case: '{}'",
            explicit
        )));
    }
    if store.find_by_slug(explicit, exclude)?.is_some() {
        return Err(TaxaError::SlugConflict {
            slug: explicit.to_string(),
        });
    }
    Ok(explicit.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::record::Category;
    use crate::category::store::MemoryCategoryStore;

    #[test]
    fn normalize_basic() {
        assert_eq!(normalize("T-Shirts"), "t-shirts");
        assert_eq!(normalize("Graphic Tees"), "graphic-tees");
        assert_eq!(normalize("  Home & Garden  "), "home-garden");
    }

    #[test]
    fn normalize_strips_diacritics() {
        assert_eq!(normalize("Café Crème"), "cafe-creme");
        // 'ß' has no decomposition and collapses to a hyphen like any
        // other non-ascii leftover
        assert_eq!(normalize("Über-Größen"), "uber-gro-en");
    }

    #[test]
    fn normalize_collapses_runs_and_trims_edges() {
        assert_eq!(normalize("--a///b--"), "a-b");
        assert_eq!(normalize("a - - b"), "a-b");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn is_valid_rules() {
        assert!(is_valid("t-shirts"));
        assert!(is_valid("tees2"));
        assert!(!is_valid(""));
        assert!(!is_valid("-tees"));
        assert!(!is_valid("tees-"));
        assert!(!is_valid("t--shirts"));
        assert!(!is_valid("T-Shirts"));
    }

    #[test]
    fn allocate_suffixes_on_collision() {
        let mut store = MemoryCategoryStore::new();
        store.put(Category::new("Shoes", "shoes", None)).unwrap();
        store.put(Category::new("Shoes", "shoes-1", None)).unwrap();

        let slug = allocate(&store, "Shoes", DEFAULT_PLACEHOLDER, None).unwrap();
        assert_eq!(slug, "shoes-2");
    }

    #[test]
    fn allocate_falls_back_to_placeholder() {
        let store = MemoryCategoryStore::new();
        let slug = allocate(&store, "!!!", DEFAULT_PLACEHOLDER, None).unwrap();
        assert_eq!(slug, "category");
    }

    #[test]
    fn allocate_exclude_allows_own_slug() {
        let mut store = MemoryCategoryStore::new();
        let record = Category::new("Shoes", "shoes", None);
        let id = record.id.clone();
        store.put(record).unwrap();

        let slug = allocate(&store, "Shoes", DEFAULT_PLACEHOLDER, Some(&id)).unwrap();
        assert_eq!(slug, "shoes");
    }

    #[test]
    fn claim_rejects_collision() {
        let mut store = MemoryCategoryStore::new();
        store.put(Category::new("Shoes", "shoes", None)).unwrap();

        let err = claim(&store, "shoes", None).unwrap_err();
        assert!(matches!(err, TaxaError::SlugConflict { .. }));
    }

    #[test]
    fn claim_rejects_invalid_form() {
        let store = MemoryCategoryStore::new();
        let err = claim(&store, "Graphic Tees", None).unwrap_err();
        assert!(matches!(err, TaxaError::Validation { .. }));
    }
}
