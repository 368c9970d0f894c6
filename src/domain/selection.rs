//! Cascading category selection for the product form.
//!
//! Level L offers the children of the pick at level L-1 (roots at level 0).
//! Picking at level L clears anything deeper. The deepest pick is the
//! product's primary category. Lookups re-walk from the root along the
//! stored path, bounded by the level cap.

use crate::domain::tree::CategoryNode;

/// Maximum selectable depth in the product form (3 levels).
pub const MAX_LEVELS: usize = 3;

/// Partial category path, one picked id per level.
#[derive(Debug, Clone, Default)]
pub struct CategoryCascade {
    path: Vec<String>,
}

impl CategoryCascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `id` at `level`, invalidating any picks at deeper levels.
    ///
    /// Picks beyond the cap are ignored.
    pub fn select(&mut self, level: usize, id: impl Into<String>) {
        if level >= MAX_LEVELS {
            return;
        }
        self.path.truncate(level);
        self.path.push(id.into());
    }

    pub fn selected_at(&self, level: usize) -> Option<&str> {
        self.path.get(level).map(String::as_str)
    }

    /// The deepest selected id, i.e. the product's primary category.
    pub fn primary_category(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Number of levels currently picked.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Options offered at `level`: the children of the node picked at the
    /// level above, or the roots at level 0. Empty when the path above is
    /// incomplete, a pick no longer resolves in the tree, the picked node is
    /// a leaf, or `level` is at/above the cap; callers omit such levels.
    pub fn options_at<'a>(&self, forest: &'a [CategoryNode], level: usize) -> &'a [CategoryNode] {
        if level >= MAX_LEVELS || level > self.path.len() {
            return &[];
        }
        let mut current = forest;
        for picked in self.path.iter().take(level) {
            match current.iter().find(|n| n.id() == picked.as_str()) {
                Some(node) => current = &node.children,
                None => return &[],
            }
        }
        current
    }

    /// Human-readable names along the picked path, skipping ids that no
    /// longer resolve (e.g. after a concurrent delete + refetch).
    pub fn path_names<'a>(&self, forest: &'a [CategoryNode]) -> Vec<&'a str> {
        let mut names = Vec::with_capacity(self.path.len());
        let mut current = forest;
        for picked in &self.path {
            match current.iter().find(|n| n.id() == picked.as_str()) {
                Some(node) => {
                    names.push(node.name());
                    current = &node.children;
                }
                None => break,
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::build_tree;
    use crate::domain::{Category, ParentRef};

    fn cat(id: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            parent: parent.map(|p| ParentRef::Id(p.to_string())),
        }
    }

    fn sample_forest() -> Vec<crate::domain::tree::CategoryNode> {
        build_tree(&[
            cat("fruit", "Fruit", None),
            cat("veg", "Vegetables", None),
            cat("citrus", "Citrus", Some("fruit")),
            cat("berries", "Berries", Some("fruit")),
            cat("lemons", "Lemons", Some("citrus")),
        ])
    }

    #[test]
    fn test_options_at_root_are_roots() {
        let forest = sample_forest();
        let cascade = CategoryCascade::new();
        let ids: Vec<&str> = cascade.options_at(&forest, 0).iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["fruit", "veg"]);
    }

    #[test]
    fn test_next_level_offers_children_of_pick() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "fruit");

        let ids: Vec<&str> = cascade.options_at(&forest, 1).iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["citrus", "berries"]);
    }

    #[test]
    fn test_selecting_shallow_clears_deeper_picks() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "fruit");
        cascade.select(1, "citrus");
        cascade.select(2, "lemons");
        assert_eq!(cascade.primary_category(), Some("lemons"));

        // Re-picking level 1 drops level 2.
        cascade.select(1, "berries");
        assert_eq!(cascade.depth(), 2);
        assert_eq!(cascade.selected_at(2), None);
        assert_eq!(cascade.primary_category(), Some("berries"));

        // And level 2 now offers berries' children (none).
        assert!(cascade.options_at(&forest, 2).is_empty());
    }

    #[test]
    fn test_leaf_reached_omits_level() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "veg");
        assert!(cascade.options_at(&forest, 1).is_empty());
    }

    #[test]
    fn test_level_cap_is_three() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "fruit");
        cascade.select(1, "citrus");
        cascade.select(2, "lemons");
        cascade.select(3, "beyond-the-cap");
        assert_eq!(cascade.primary_category(), Some("lemons"));
        assert!(cascade.options_at(&forest, 3).is_empty());
    }

    #[test]
    fn test_stale_pick_yields_no_options() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "deleted-meanwhile");
        assert!(cascade.options_at(&forest, 1).is_empty());
        assert!(cascade.path_names(&forest).is_empty());
    }

    #[test]
    fn test_path_names_follow_picks() {
        let forest = sample_forest();
        let mut cascade = CategoryCascade::new();
        cascade.select(0, "fruit");
        cascade.select(1, "citrus");
        assert_eq!(cascade.path_names(&forest), vec!["Fruit", "Citrus"]);
    }
}
