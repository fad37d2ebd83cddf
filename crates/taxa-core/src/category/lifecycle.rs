//! Category lifecycle
//!
//! Orchestrates create/update/delete over an injected store, enforcing the
//! structural invariants (slug uniqueness, acyclic parenting, depth bound,
//! childless delete) before delegating cache maintenance to `ancestry`.

use chrono::Utc;

use crate::config::Config;
use crate::error::{Result, TaxaError};

use super::ancestry;
use super::record::{Category, CategoryId, CategoryPatch, ImagePatch, ParentPatch};
use super::resolver;
use super::slug;
use super::store::CategoryStore;

/// Lifecycle manager owning the store handle
pub struct CategoryLifecycle<S: CategoryStore> {
    store: S,
    max_depth: usize,
    slug_placeholder: String,
}

impl<S: CategoryStore> CategoryLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            max_depth: config.tree.max_depth.max(1),
            slug_placeholder: config.slug.placeholder.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create a category
    ///
    /// Derived slugs are allocated with collision suffixes; an explicit slug
    /// that is taken fails with a conflict. A parented node gets its
    /// ancestor cache filled in before the record is returned; if that
    /// recompute fails the create fails too, and the already-persisted node
    /// is left in place (no rollback — its cache heals on its next update).
    pub fn create(
        &mut self,
        name: &str,
        explicit_slug: Option<&str>,
        parent_id: Option<&CategoryId>,
    ) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaxaError::validation("name must not be empty"));
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .store
                .get(parent_id)?
                .ok_or_else(|| TaxaError::ParentNotFound {
                    id: parent_id.to_string(),
                })?;
            self.check_depth(&parent)?;
        }

        let slug = match explicit_slug {
            Some(explicit) => slug::claim(&self.store, explicit, None)?,
            None => slug::allocate(&self.store, name, &self.slug_placeholder, None)?,
        };

        let record = Category::new(name, slug, parent_id.cloned());
        let id = record.id.clone();
        self.store.put(record)?;

        if parent_id.is_some() {
            ancestry::recompute(&mut self.store, &id)?;
        }

        resolver::by_id(&self.store, &id)
    }

    /// Apply a partial update
    ///
    /// Name, slug, and parent changes all trigger a full cascade over the
    /// node's subtree, because descendants embed this node's identity in
    /// their caches. An image change is scalar-only and never cascades; an
    /// empty patch writes nothing at all.
    pub fn update(&mut self, id: &CategoryId, patch: CategoryPatch) -> Result<Category> {
        let mut node = resolver::by_id(&self.store, id)?;

        let mut structural = false;
        let mut scalar = false;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(TaxaError::validation("name must not be empty"));
            }
            if name != node.name {
                node.name = name;
                structural = true;
            }
        }

        if let Some(requested) = patch.slug {
            if requested != node.slug {
                node.slug = slug::claim(&self.store, &requested, Some(&node.id))?;
                structural = true;
            }
        }

        match patch.parent {
            ParentPatch::Keep => {}
            ParentPatch::Clear => {
                if node.parent_id.is_some() {
                    node.parent_id = None;
                    structural = true;
                }
            }
            ParentPatch::Set(parent_id) => {
                if node.parent_id.as_ref() != Some(&parent_id) {
                    self.check_new_parent(&node, &parent_id)?;
                    node.parent_id = Some(parent_id);
                    structural = true;
                }
            }
        }

        match patch.image {
            ImagePatch::Keep => {}
            ImagePatch::Clear => {
                if node.image.is_some() {
                    node.image = None;
                    scalar = true;
                }
            }
            ImagePatch::Set(reference) => {
                if node.image.as_deref() != Some(reference.as_str()) {
                    node.image = Some(reference);
                    scalar = true;
                }
            }
        }

        if !structural && !scalar {
            return Ok(node);
        }

        node.updated_at = Utc::now();
        self.store.put(node.clone())?;

        if structural {
            ancestry::cascade(&mut self.store, &node.id)?;
        }

        resolver::by_id(&self.store, &node.id)
    }

    /// Delete a childless category
    pub fn delete(&mut self, id: &CategoryId) -> Result<Category> {
        let node = resolver::by_id(&self.store, id)?;

        let children = self.store.children(id)?;
        if !children.is_empty() {
            return Err(TaxaError::HasChildren {
                id: id.to_string(),
                children: children.len(),
            });
        }

        self.store.remove(id)?;
        Ok(node)
    }

    pub fn resolve_by_id(&self, id: &CategoryId) -> Result<Category> {
        resolver::by_id(&self.store, id)
    }

    pub fn resolve_by_slug(&self, slug: &str) -> Result<Category> {
        resolver::by_slug(&self.store, slug)
    }

    pub fn resolve_by_slug_path(&self, segments: &[&str]) -> Result<Category> {
        resolver::by_slug_path(&self.store, segments)
    }

    /// Depth of a node parented under `parent`, counting the root as 1
    fn check_depth(&self, parent: &Category) -> Result<()> {
        let depth = parent.ancestors.len() + 2;
        if depth > self.max_depth {
            return Err(TaxaError::validation(format!(
                "depth limit of {} exceeded",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Validate a reparent target: must exist, must not be the node itself,
    /// and must not sit inside the node's own subtree
    fn check_new_parent(&self, node: &Category, parent_id: &CategoryId) -> Result<()> {
        if *parent_id == node.id {
            return Err(TaxaError::validation("category cannot be its own parent"));
        }

        let parent = self
            .store
            .get(parent_id)?
            .ok_or_else(|| TaxaError::ParentNotFound {
                id: parent_id.to_string(),
            })?;

        // The candidate's cached chain names every node above it; finding
        // ourselves there means we'd be moving into our own subtree
        if parent.ancestors.iter().any(|a| a.id == node.id) {
            return Err(TaxaError::validation(format!(
                "cannot move '{}' under its own descendant '{}'",
                node.slug, parent.slug
            )));
        }

        self.check_depth(&parent)
    }
}
