//! Category use cases: cached tree + flat parent list over CategoryApi.
//!
//! The backend's flat listing is the single source of records; the nested
//! tree is rebuilt locally after every refresh. Mutations await the backend
//! before refetching, so the displayed tree reflects at least the
//! just-completed operation.

use crate::domain::tree::{build_tree, depth_of, flatten, CategoryNode};
use crate::domain::{Category, CategoryDraft, DomainError};
use crate::ports::CategoryApi;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Nodes deeper than this get no "add subcategory" action (2 levels below
/// root), independently of the tree's own depth.
pub const MAX_SUBCATEGORY_DEPTH: usize = 2;

#[derive(Debug, Default)]
struct Cache {
    tree: Vec<CategoryNode>,
    parents: Vec<Category>,
}

/// Category service. Owns the in-memory tree, delegates I/O to the port.
pub struct CategoryService {
    api: Arc<dyn CategoryApi>,
    cache: RwLock<Cache>,
}

impl CategoryService {
    pub fn new(api: Arc<dyn CategoryApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(Cache::default()),
        }
    }

    /// Refetch flat records and the parent list, rebuild the tree.
    pub async fn refresh(&self) -> Result<(), DomainError> {
        let records = self.api.list().await?;
        let parents = self.api.parents().await?;
        let tree = build_tree(&records);
        info!(
            total = records.len(),
            roots = tree.len(),
            "refreshed categories"
        );
        let mut cache = self.cache.write().await;
        cache.tree = tree;
        cache.parents = parents;
        Ok(())
    }

    /// Current tree (clone; the UI walks it freely between refreshes).
    pub async fn tree(&self) -> Vec<CategoryNode> {
        self.cache.read().await.tree.clone()
    }

    /// Pre-order flat view of the cached tree, as (id, name, depth) rows.
    /// Feeds the parent-selection dropdown and the dashboard counters.
    pub async fn flat(&self) -> Vec<(String, String, usize)> {
        let cache = self.cache.read().await;
        flatten(&cache.tree)
            .into_iter()
            .map(|node| {
                let depth = depth_of(&cache.tree, node.id()).unwrap_or(0);
                (node.id().to_string(), node.name().to_string(), depth)
            })
            .collect()
    }

    /// Root categories as reported by the backend's parent listing.
    pub async fn parents(&self) -> Vec<Category> {
        self.cache.read().await.parents.clone()
    }

    /// Depth of a cached node, if present.
    pub async fn depth_of(&self, id: &str) -> Option<usize> {
        depth_of(&self.cache.read().await.tree, id)
    }

    /// (total, roots, subcategories) over the cached tree.
    pub async fn counts(&self) -> (usize, usize, usize) {
        let cache = self.cache.read().await;
        let total = flatten(&cache.tree).len();
        let roots = cache.tree.len();
        (total, roots, total - roots)
    }

    pub async fn add(&self, draft: CategoryDraft) -> Result<(), DomainError> {
        let created = self.api.create(&draft).await?;
        info!(id = %created.id, name = %created.name, "category created");
        // Refetch only after the mutation resolved.
        self.refresh().await
    }

    pub async fn update(&self, id: &str, draft: CategoryDraft) -> Result<(), DomainError> {
        let updated = self.api.update(id, &draft).await?;
        info!(id = %updated.id, "category updated");
        self.refresh().await
    }

    /// Delete by id. Confirmation happens in the UI layer before this is
    /// called; cascading rules are the backend's concern.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.api.delete(id).await?;
        info!(id, "category deleted");
        self.refresh().await
    }
}
