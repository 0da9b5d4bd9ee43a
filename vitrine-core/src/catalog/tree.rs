//! Category hierarchy built from the flat, parent-referencing list served by
//! the catalog API.
//!
//! The builder indexes nodes by parent id once, so construction is linear in
//! the number of nodes. Malformed admin data never aborts navigation:
//!
//! - a node whose parent id is unknown becomes a root;
//! - nodes stranded in a parent cycle are promoted to roots, breaking the
//!   cycle at the first stranded node in input order;
//! - a repeated id keeps its first occurrence.
//!
//! With these rules every distinct id of the input appears exactly once in the
//! resulting forest.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};
use vitrine_model::{CategoryId, CategoryNode};

/// One node of the navigable category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    pub id: CategoryId,
    pub name: String,
    pub children: Vec<CategoryTree>,
}

impl CategoryTree {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first lookup within this subtree, including the node itself.
    pub fn find(&self, id: CategoryId) -> Option<&CategoryTree> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Ids of this node and every node below it.
    pub fn subtree_ids(&self) -> BTreeSet<CategoryId> {
        let mut ids = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.insert(node.id);
            stack.extend(node.children.iter());
        }
        ids
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CategoryTree::size).sum::<usize>()
    }
}

/// Owned set of root trees plus the lookups browse screens need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryForest {
    roots: Vec<CategoryTree>,
}

impl CategoryForest {
    pub fn build(nodes: &[CategoryNode]) -> Self {
        let mut seen: HashSet<CategoryId> = HashSet::with_capacity(nodes.len());
        let mut unique: Vec<&CategoryNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            if seen.insert(node.id) {
                unique.push(node);
            } else {
                warn!(
                    category_id = %node.id,
                    "duplicate category id in flat list; keeping first occurrence"
                );
            }
        }

        let mut children_of: HashMap<CategoryId, Vec<&CategoryNode>> =
            HashMap::new();
        let mut roots: Vec<&CategoryNode> = Vec::new();
        for node in unique.iter().copied() {
            match node.parent_id {
                None => roots.push(node),
                Some(parent) if seen.contains(&parent) => {
                    children_of.entry(parent).or_default().push(node);
                }
                Some(parent) => {
                    warn!(
                        category_id = %node.id,
                        parent_id = %parent,
                        "category references unknown parent; promoting to root"
                    );
                    roots.push(node);
                }
            }
        }

        let mut visited: HashSet<CategoryId> =
            HashSet::with_capacity(unique.len());
        let mut trees: Vec<CategoryTree> = roots
            .into_iter()
            .map(|root| attach(root, &children_of, &mut visited))
            .collect();

        for node in unique.iter().copied() {
            if !visited.contains(&node.id) {
                warn!(
                    category_id = %node.id,
                    "category is part of a parent cycle; promoting to root"
                );
                trees.push(attach(node, &children_of, &mut visited));
            }
        }

        debug!(
            nodes = unique.len(),
            roots = trees.len(),
            "built category forest"
        );
        Self { roots: trees }
    }

    pub fn roots(&self) -> &[CategoryTree] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<CategoryTree> {
        self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.iter().map(CategoryTree::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: CategoryId) -> Option<&CategoryTree> {
        find_in(&self.roots, id)
    }

    /// Subtree ids for `id`, always including `id` itself.
    ///
    /// An id missing from the forest yields just `{id}`, so a category page
    /// opened before the cache caught up still filters on its own category.
    pub fn descendant_ids(&self, id: CategoryId) -> BTreeSet<CategoryId> {
        descendant_ids(&self.roots, id)
    }

    /// Root-to-node path used for "Parent / Child" headings. Empty when the
    /// id is unknown.
    pub fn breadcrumb(&self, id: CategoryId) -> Vec<&CategoryTree> {
        let mut path = Vec::new();
        if path_to(&self.roots, id, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    /// Parent of `id` inside the forest, `None` for roots and unknown ids.
    pub fn parent_of(&self, id: CategoryId) -> Option<&CategoryTree> {
        let path = self.breadcrumb(id);
        path.len().checked_sub(2).map(|idx| path[idx])
    }

    /// `(id, parent id)` pairs in depth-first order; the inverse of
    /// [`CategoryForest::build`] for well-formed input.
    pub fn flatten(&self) -> Vec<(CategoryId, Option<CategoryId>)> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<(&CategoryTree, Option<CategoryId>)> =
            self.roots.iter().rev().map(|root| (root, None)).collect();
        while let Some((node, parent)) = stack.pop() {
            out.push((node.id, parent));
            stack.extend(
                node.children.iter().rev().map(|child| (child, Some(node.id))),
            );
        }
        out
    }
}

impl From<Vec<CategoryTree>> for CategoryForest {
    fn from(roots: Vec<CategoryTree>) -> Self {
        Self { roots }
    }
}

/// Build root trees from a flat category list.
pub fn build_tree(nodes: &[CategoryNode]) -> Vec<CategoryTree> {
    CategoryForest::build(nodes).into_roots()
}

/// Ids of `id` and all of its descendants within `tree`.
pub fn descendant_ids(
    tree: &[CategoryTree],
    id: CategoryId,
) -> BTreeSet<CategoryId> {
    match find_in(tree, id) {
        Some(node) => node.subtree_ids(),
        None => BTreeSet::from([id]),
    }
}

fn attach(
    node: &CategoryNode,
    children_of: &HashMap<CategoryId, Vec<&CategoryNode>>,
    visited: &mut HashSet<CategoryId>,
) -> CategoryTree {
    visited.insert(node.id);
    let mut children = Vec::new();
    if let Some(kids) = children_of.get(&node.id) {
        for kid in kids.iter().copied() {
            if !visited.contains(&kid.id) {
                children.push(attach(kid, children_of, visited));
            }
        }
    }
    CategoryTree {
        id: node.id,
        name: node.name.clone(),
        children,
    }
}

fn find_in(roots: &[CategoryTree], id: CategoryId) -> Option<&CategoryTree> {
    roots.iter().find_map(|root| root.find(id))
}

fn path_to<'a>(
    nodes: &'a [CategoryTree],
    id: CategoryId,
    path: &mut Vec<&'a CategoryTree>,
) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || path_to(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> BTreeSet<CategoryId> {
        values.iter().copied().map(CategoryId).collect()
    }

    fn sample() -> Vec<CategoryNode> {
        vec![
            CategoryNode::root(1, "Men"),
            CategoryNode::child(2, "Shirts", 1),
            CategoryNode::child(3, "Polo", 2),
            CategoryNode::root(10, "Women"),
            CategoryNode::child(11, "Dresses", 10),
            CategoryNode::child(12, "Skirts", 10),
        ]
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = CategoryForest::build(&[]);
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn children_follow_parent_references_in_input_order() {
        let roots = build_tree(&sample());
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "Men");
        assert_eq!(roots[0].children[0].children[0].id, CategoryId(3));
        let women: Vec<_> =
            roots[1].children.iter().map(|c| c.id.get()).collect();
        assert_eq!(women, vec![11, 12]);
    }

    #[test]
    fn flatten_round_trips_well_formed_input() {
        let nodes = sample();
        let forest = CategoryForest::build(&nodes);

        let mut expected: Vec<_> =
            nodes.iter().map(|n| (n.id, n.parent_id)).collect();
        let mut actual = forest.flatten();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn dangling_parent_is_promoted_to_root() {
        let nodes = vec![
            CategoryNode::root(1, "Men"),
            CategoryNode::child(5, "Orphan", 99),
        ];
        let roots = build_tree(&nodes);
        let root_ids: Vec<_> = roots.iter().map(|r| r.id.get()).collect();
        assert_eq!(root_ids, vec![1, 5]);
    }

    #[test]
    fn parent_cycle_is_broken_and_every_id_kept_once() {
        let nodes = vec![
            CategoryNode::root(1, "Men"),
            CategoryNode::child(7, "Loop A", 8),
            CategoryNode::child(8, "Loop B", 7),
            CategoryNode::child(9, "Self", 9),
        ];
        let forest = CategoryForest::build(&nodes);
        assert_eq!(forest.len(), 4);

        let mut flat: Vec<_> = forest.flatten().into_iter().map(|p| p.0).collect();
        flat.sort();
        assert_eq!(flat, ids(&[1, 7, 8, 9]).into_iter().collect::<Vec<_>>());

        let loop_root = forest.roots().iter().find(|r| r.id == CategoryId(7));
        let loop_root = loop_root.expect("first stranded node becomes root");
        assert_eq!(loop_root.children[0].id, CategoryId(8));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let nodes = vec![
            CategoryNode::root(1, "Men"),
            CategoryNode::root(1, "Men (copy)"),
        ];
        let roots = build_tree(&nodes);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Men");
    }

    #[test]
    fn descendant_closure_on_three_level_chain() {
        let nodes = vec![
            CategoryNode::root(1, "A"),
            CategoryNode::child(2, "B", 1),
            CategoryNode::child(3, "C", 2),
        ];
        let roots = build_tree(&nodes);
        assert_eq!(descendant_ids(&roots, CategoryId(1)), ids(&[1, 2, 3]));
        assert_eq!(descendant_ids(&roots, CategoryId(2)), ids(&[2, 3]));
        assert_eq!(descendant_ids(&roots, CategoryId(3)), ids(&[3]));
    }

    #[test]
    fn unknown_id_yields_itself() {
        let forest = CategoryForest::build(&sample());
        assert_eq!(forest.descendant_ids(CategoryId(404)), ids(&[404]));
    }

    #[test]
    fn breadcrumb_walks_from_root() {
        let forest = CategoryForest::build(&sample());
        let names: Vec<_> = forest
            .breadcrumb(CategoryId(3))
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["Men", "Shirts", "Polo"]);
        assert_eq!(
            forest.parent_of(CategoryId(12)).map(|p| p.id),
            Some(CategoryId(10))
        );
        assert!(forest.parent_of(CategoryId(10)).is_none());
        assert!(forest.breadcrumb(CategoryId(404)).is_empty());
    }
}
