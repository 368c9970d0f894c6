//! Category tree builder. Pure data, decoupled from rendering.
//!
//! `build_tree` turns the backend's flat records into a forest;
//! `flatten` walks it back out in pre-order. The rendering layer and the
//! cascading selector merely walk the resulting structure.

use crate::domain::Category;
use std::collections::HashMap;

/// A category with its children resolved. Derived, never persisted.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn id(&self) -> &str {
        &self.category.id
    }

    pub fn name(&self) -> &str {
        &self.category.name
    }
}

/// Build a forest from flat records.
///
/// Each record attaches under its parent when the parent is present in the
/// input; records with no parent, or whose parent id does not resolve, become
/// roots (tolerant, not an error). Sibling order preserves input order. No
/// depth limit is enforced here; the UI's 3-level selection cap is a
/// separate concern.
pub fn build_tree(records: &[Category]) -> Vec<CategoryNode> {
    let ids: HashMap<&str, usize> = records
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();

    // children_of[i] = input indices of i's children; roots collect the rest.
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match record.parent_id().and_then(|pid| ids.get(pid).copied()) {
            Some(parent_idx) if parent_idx != i => children_of[parent_idx].push(i),
            // Self-parented records would otherwise vanish; treat as root.
            _ => roots.push(i),
        }
    }

    roots
        .iter()
        .map(|&i| assemble(records, &children_of, i))
        .collect()
}

fn assemble(records: &[Category], children_of: &[Vec<usize>], idx: usize) -> CategoryNode {
    CategoryNode {
        category: records[idx].clone(),
        children: children_of[idx]
            .iter()
            .map(|&child| assemble(records, children_of, child))
            .collect(),
    }
}

/// Pre-order flat view of a forest. Visits every node exactly once.
///
/// Used for parent-selection dropdowns and counting.
pub fn flatten(forest: &[CategoryNode]) -> Vec<&CategoryNode> {
    let mut out = Vec::new();
    for node in forest {
        push_subtree(node, &mut out);
    }
    out
}

fn push_subtree<'a>(node: &'a CategoryNode, out: &mut Vec<&'a CategoryNode>) {
    out.push(node);
    for child in &node.children {
        push_subtree(child, out);
    }
}

/// Depth (0 = root) of a node in the forest, or None if absent.
pub fn depth_of(forest: &[CategoryNode], id: &str) -> Option<usize> {
    fn walk(nodes: &[CategoryNode], id: &str, depth: usize) -> Option<usize> {
        for node in nodes {
            if node.id() == id {
                return Some(depth);
            }
            if let Some(d) = walk(&node.children, id, depth + 1) {
                return Some(d);
            }
        }
        None
    }
    walk(forest, id, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParentRef;

    fn cat(id: &str, name: &str, parent: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            parent: parent.map(|p| ParentRef::Id(p.to_string())),
        }
    }

    #[test]
    fn test_build_tree_orphan_parent_becomes_root() {
        // A <- B, C points at a missing id 99.
        let records = vec![
            cat("1", "A", None),
            cat("2", "B", Some("1")),
            cat("3", "C", Some("99")),
        ];
        let tree = build_tree(&records);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name(), "A");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name(), "B");
        assert_eq!(tree[1].name(), "C");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_flatten_is_preorder_permutation() {
        let records = vec![
            cat("1", "A", None),
            cat("2", "B", Some("1")),
            cat("3", "C", Some("99")),
        ];
        let tree = build_tree(&records);
        let flat = flatten(&tree);

        let names: Vec<&str> = flat.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        // Permutation: every input record exactly once.
        let mut ids: Vec<&str> = flat.iter().map(|n| n.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parent_pointer_matches_built_parent() {
        let records = vec![
            cat("r", "Root", None),
            cat("a", "Mid", Some("r")),
            cat("b", "Leaf", Some("a")),
            cat("c", "Leaf2", Some("a")),
        ];
        let tree = build_tree(&records);

        assert_eq!(tree.len(), 1);
        let mid = &tree[0].children[0];
        assert_eq!(mid.id(), "a");
        for child in &mid.children {
            assert_eq!(child.category.parent_id(), Some("a"));
        }
    }

    #[test]
    fn test_sibling_order_preserved() {
        let records = vec![
            cat("p", "P", None),
            cat("z", "Z", Some("p")),
            cat("a", "A", Some("p")),
            cat("m", "M", Some("p")),
        ];
        let tree = build_tree(&records);
        let order: Vec<&str> = tree[0].children.iter().map(|n| n.id()).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_deep_chain_flattens_every_node_once() {
        // Deeper than the UI's 3-level cap: the builder does not care.
        let mut records = vec![cat("0", "N0", None)];
        for i in 1..10 {
            records.push(cat(&i.to_string(), &format!("N{i}"), Some(&(i - 1).to_string())));
        }
        let tree = build_tree(&records);
        assert_eq!(tree.len(), 1);
        assert_eq!(flatten(&tree).len(), 10);
        assert_eq!(depth_of(&tree, "9"), Some(9));
    }

    #[test]
    fn test_rebuild_after_delete_and_refetch() {
        // Deleting "2" and refetching [1, 3] yields roots [A, C], A childless.
        let refetched = vec![cat("1", "A", None), cat("3", "C", Some("99"))];
        let tree = build_tree(&refetched);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name(), "A");
        assert!(tree[0].children.is_empty());
        assert_eq!(tree[1].name(), "C");
    }

    #[test]
    fn test_self_parented_record_does_not_loop() {
        let records = vec![cat("1", "A", Some("1"))];
        let tree = build_tree(&records);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }
}
