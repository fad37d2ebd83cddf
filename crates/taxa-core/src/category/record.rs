use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new() -> Self {
        let id = format!("cat-{}", uuid::Uuid::new_v4().simple());
        Self(id)
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one ancestor, as cached on every descendant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A catalog category node
///
/// `ancestors` is a derived cache (root first, immediate parent last) and is
/// written exclusively by the `ancestry` module. Everything else is owned by
/// the lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub ancestors: Vec<AncestorRef>,
    /// Opaque image reference managed by the image-storage collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a fresh node with empty ancestors (cache filled in later)
    pub fn new(name: impl Into<String>, slug: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            slug: slug.into(),
            parent_id,
            ancestors: Vec::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The summary entry this node contributes to its descendants' caches
    pub fn summary(&self) -> AncestorRef {
        AncestorRef {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }

    /// Ancestor slugs, root first
    pub fn ancestor_slugs(&self) -> Vec<&str> {
        self.ancestors.iter().map(|a| a.slug.as_str()).collect()
    }

    /// Full slug path including the node's own slug
    pub fn slug_path(&self) -> String {
        let mut segments = self.ancestor_slugs();
        segments.push(&self.slug);
        segments.join("/")
    }

    pub fn display_updated(&self) -> String {
        self.updated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Parent change requested by a patch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentPatch {
    /// Leave the parent as-is
    #[default]
    Keep,
    /// Detach and make the node a root
    Clear,
    /// Move under the given node
    Set(CategoryId),
}

/// Image reference change requested by a patch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImagePatch {
    #[default]
    Keep,
    Clear,
    Set(String),
}

/// Partial update applied by `CategoryLifecycle::update`
///
/// Unset fields leave the record untouched; an all-default patch is a no-op
/// and must not trigger a cascade.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent: ParentPatch,
    pub image: ImagePatch,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.parent == ParentPatch::Keep
            && self.image == ImagePatch::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_format() {
        let id = CategoryId::new();
        assert!(id.as_str().starts_with("cat-"));
        assert_eq!(id.as_str().len(), "cat-".len() + 32);
    }

    #[test]
    fn slug_path_joins_ancestors() {
        let mut node = Category::new("Graphic Tees", "graphic-tees", None);
        node.ancestors = vec![
            AncestorRef {
                id: CategoryId::new(),
                name: "Apparel".to_string(),
                slug: "apparel".to_string(),
            },
            AncestorRef {
                id: CategoryId::new(),
                name: "T-Shirts".to_string(),
                slug: "t-shirts".to_string(),
            },
        ];
        assert_eq!(node.slug_path(), "apparel/t-shirts/graphic-tees");
    }

    #[test]
    fn empty_patch_detected() {
        assert!(CategoryPatch::default().is_empty());
        let patch = CategoryPatch {
            name: Some("New".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
