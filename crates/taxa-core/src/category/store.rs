//! Category store
//!
//! Keyed persistence for category records. All engine components go through
//! the `CategoryStore` trait; the file-backed implementation keeps the whole
//! collection in `categories.json` under the base directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxaError};

use super::record::{Category, CategoryId};

/// Storage handle injected into every engine component
///
/// Implementations map their own failures to `TaxaError::StoreUnavailable`;
/// nothing below that kind leaks to callers.
pub trait CategoryStore {
    /// Look up a record by id
    fn get(&self, id: &CategoryId) -> Result<Option<Category>>;

    /// Insert or replace a record
    fn put(&mut self, record: Category) -> Result<()>;

    /// Remove a record, returning it if present
    fn remove(&mut self, id: &CategoryId) -> Result<Option<Category>>;

    /// Direct children of the given node (sibling order unspecified)
    fn children(&self, parent: &CategoryId) -> Result<Vec<Category>>;

    /// All records (order unspecified)
    fn all(&self) -> Result<Vec<Category>>;

    /// Record holding the given slug, if any, skipping `exclude`
    fn find_by_slug(&self, slug: &str, exclude: Option<&CategoryId>) -> Result<Option<Category>>;

    fn contains(&self, id: &CategoryId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory store; the substrate of the file store and useful on its own
/// for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryCategoryStore {
    categories: HashMap<CategoryId, Category>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CategoryStore for MemoryCategoryStore {
    fn get(&self, id: &CategoryId) -> Result<Option<Category>> {
        Ok(self.categories.get(id).cloned())
    }

    fn put(&mut self, record: Category) -> Result<()> {
        self.categories.insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&mut self, id: &CategoryId) -> Result<Option<Category>> {
        Ok(self.categories.remove(id))
    }

    fn children(&self, parent: &CategoryId) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .values()
            .filter(|c| c.parent_id.as_ref() == Some(parent))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Category>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn find_by_slug(&self, slug: &str, exclude: Option<&CategoryId>) -> Result<Option<Category>> {
        Ok(self
            .categories
            .values()
            .filter(|c| Some(&c.id) != exclude)
            .find(|c| c.slug == slug)
            .cloned())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.categories.len())
    }
}

/// On-disk document shape
#[derive(Debug, Serialize, Deserialize, Default)]
struct StoreFile {
    categories: Vec<Category>,
}

/// File-backed store: write-through JSON document in the base directory
#[derive(Debug)]
pub struct JsonCategoryStore {
    path: PathBuf,
    inner: MemoryCategoryStore,
}

impl JsonCategoryStore {
    const FILENAME: &'static str = "categories.json";

    /// Open (or create empty) the store under the base directory
    pub fn open(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(Self::FILENAME);
        let mut inner = MemoryCategoryStore::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: StoreFile =
                serde_json::from_str(&content).map_err(|e| TaxaError::StoreUnavailable {
                    message: format!("corrupt store file {}: {}", path.display(), e),
                })?;
            for record in file.categories {
                inner.put(record)?;
            }
        }

        Ok(Self { path, inner })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let mut categories = self.inner.all()?;
        // Stable output so the document diffs cleanly
        categories.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        let file = StoreFile { categories };

        let content =
            serde_json::to_string_pretty(&file).map_err(|e| TaxaError::StoreUnavailable {
                message: format!("serialize store: {}", e),
            })?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CategoryStore for JsonCategoryStore {
    fn get(&self, id: &CategoryId) -> Result<Option<Category>> {
        self.inner.get(id)
    }

    fn put(&mut self, record: Category) -> Result<()> {
        self.inner.put(record)?;
        self.flush()
    }

    fn remove(&mut self, id: &CategoryId) -> Result<Option<Category>> {
        let removed = self.inner.remove(id)?;
        if removed.is_some() {
            self.flush()?;
        }
        Ok(removed)
    }

    fn children(&self, parent: &CategoryId) -> Result<Vec<Category>> {
        self.inner.children(parent)
    }

    fn all(&self) -> Result<Vec<Category>> {
        self.inner.all()
    }

    fn find_by_slug(&self, slug: &str, exclude: Option<&CategoryId>) -> Result<Option<Category>> {
        self.inner.find_by_slug(slug, exclude)
    }

    fn len(&self) -> Result<usize> {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryCategoryStore::new();
        let record = Category::new("Apparel", "apparel", None);
        let id = record.id.clone();

        store.put(record).unwrap();
        assert!(store.contains(&id).unwrap());
        assert_eq!(store.get(&id).unwrap().unwrap().slug, "apparel");

        let removed = store.remove(&id).unwrap().unwrap();
        assert_eq!(removed.id, id);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn find_by_slug_respects_exclude() {
        let mut store = MemoryCategoryStore::new();
        let record = Category::new("Apparel", "apparel", None);
        let id = record.id.clone();
        store.put(record).unwrap();

        assert!(store.find_by_slug("apparel", None).unwrap().is_some());
        assert!(store.find_by_slug("apparel", Some(&id)).unwrap().is_none());
        assert!(store.find_by_slug("missing", None).unwrap().is_none());
    }

    #[test]
    fn children_filters_by_parent() {
        let mut store = MemoryCategoryStore::new();
        let root = Category::new("Apparel", "apparel", None);
        let root_id = root.id.clone();
        store.put(root).unwrap();
        store
            .put(Category::new("Shoes", "shoes", Some(root_id.clone())))
            .unwrap();
        store
            .put(Category::new("Hats", "hats", Some(root_id.clone())))
            .unwrap();
        store.put(Category::new("Garden", "garden", None)).unwrap();

        let children = store.children(&root_id).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.parent_id == Some(root_id.clone())));
    }

    #[test]
    fn json_store_persists_across_open() {
        let temp = TempDir::new().unwrap();

        let mut store = JsonCategoryStore::open(temp.path()).unwrap();
        let record = Category::new("Apparel", "apparel", None);
        let id = record.id.clone();
        store.put(record).unwrap();

        let reopened = JsonCategoryStore::open(temp.path()).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get(&id).unwrap().unwrap().name, "Apparel");
    }

    #[test]
    fn json_store_empty_when_file_missing() {
        let temp = TempDir::new().unwrap();
        let store = JsonCategoryStore::open(temp.path()).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn json_store_rejects_corrupt_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("categories.json"), "not json").unwrap();

        let err = JsonCategoryStore::open(temp.path()).unwrap_err();
        assert!(matches!(err, TaxaError::StoreUnavailable { .. }));
    }
}
