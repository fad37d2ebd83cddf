//! # Category Module
//!
//! The category hierarchy consistency engine: a tree of catalog categories
//! where every node carries a globally unique slug and a denormalized cache
//! of its ancestor chain (a materialized path, for fast breadcrumb and
//! slug-path lookups). The modules here keep those caches correct under
//! arbitrary structural edits.
//!
//! ## Module layout
//!
//! - `record`: the `Category` record, ids, and patch types
//! - `store`: the injected `CategoryStore` trait plus memory/file backends
//! - `slug`: unique slug normalization and allocation
//! - `ancestry`: ancestor-cache recomputation and subtree cascades
//! - `resolver`: read-only lookups by id, slug, or full slug path
//! - `lifecycle`: create/update/delete orchestration and invariant checks
//!
//! ## Usage
//!
//! ```rust
//! use taxa_core::category::{CategoryLifecycle, MemoryCategoryStore};
//!
//! let mut lifecycle = CategoryLifecycle::new(MemoryCategoryStore::new());
//!
//! let apparel = lifecycle.create("Apparel", None, None).unwrap();
//! let tees = lifecycle.create("T-Shirts", None, Some(&apparel.id)).unwrap();
//!
//! assert_eq!(tees.slug, "t-shirts");
//! assert_eq!(tees.ancestor_slugs(), vec!["apparel"]);
//! assert_eq!(
//!     lifecycle.resolve_by_slug_path(&["apparel", "t-shirts"]).unwrap().id,
//!     tees.id
//! );
//! ```

pub mod ancestry;
pub mod lifecycle;
pub mod record;
pub mod resolver;
pub mod slug;
pub mod store;

// Re-exports
pub use ancestry::CascadeReport;
pub use lifecycle::CategoryLifecycle;
pub use record::{AncestorRef, Category, CategoryId, CategoryPatch, ImagePatch, ParentPatch};
pub use store::{CategoryStore, JsonCategoryStore, MemoryCategoryStore};
