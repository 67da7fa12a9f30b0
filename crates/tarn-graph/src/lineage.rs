//! Rooted discovery tree.
//!
//! A [`Lineage`] records which node discovered which during a graph walk.
//! Edges always point from the discovering (parent) node to the discovered
//! (child) node, so every member has exactly one path back to the root.

use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

#[derive(Clone, Debug)]
struct Node<T> {
    parent: Option<T>,
    children: usize,
}

/// A rooted tree built in discovery order.
///
/// Supports membership tests, linking, path-to-root reconstruction, leaf
/// enumeration and leaf pruning. Pruning a leaf may turn its parent into a
/// new leaf; pruning the last node (the root) leaves the tree empty.
///
/// # Examples
///
/// ```
/// use tarn_graph::Lineage;
///
/// let mut tree = Lineage::new('r');
/// assert!(tree.link(&'r', 'a'));
/// assert!(tree.link(&'a', 'b'));
///
/// assert_eq!(tree.root_path(&'b'), vec!['b', 'a', 'r']);
/// assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![&'b']);
///
/// assert!(tree.prune(&'b'));
/// assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![&'a']);
/// ```
#[derive(Clone, Debug)]
pub struct Lineage<T> {
    root: T,
    nodes: IndexMap<T, Node<T>>,
    leaves: IndexSet<T>,
}

impl<T: Clone + Eq + Hash> Lineage<T> {
    /// Create a tree containing only `root`.
    pub fn new(root: T) -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(
            root.clone(),
            Node {
                parent: None,
                children: 0,
            },
        );
        let mut leaves = IndexSet::new();
        leaves.insert(root.clone());
        Self {
            root,
            nodes,
            leaves,
        }
    }

    /// The root, unless it has been pruned.
    pub fn root(&self) -> Option<&T> {
        self.nodes.get_key_value(&self.root).map(|(k, _)| k)
    }

    /// Whether `element` is a member of the tree.
    pub fn contains(&self, element: &T) -> bool {
        self.nodes.contains_key(element)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether every member has been pruned.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach `child` under `parent`.
    ///
    /// Returns `false`, leaving the tree unchanged, if `parent` is not a
    /// member or `child` already is one.
    pub fn link(&mut self, parent: &T, child: T) -> bool {
        if self.nodes.contains_key(&child) {
            return false;
        }
        let Some(node) = self.nodes.get_mut(parent) else {
            return false;
        };
        node.children += 1;
        self.leaves.swap_remove(parent);
        self.nodes.insert(
            child.clone(),
            Node {
                parent: Some(parent.clone()),
                children: 0,
            },
        );
        self.leaves.insert(child);
        true
    }

    /// Path from `element` up to the root, both ends included.
    ///
    /// Empty if `element` is not a member.
    pub fn root_path(&self, element: &T) -> Vec<T> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get_key_value(element);
        while let Some((key, node)) = cursor {
            path.push(key.clone());
            cursor = node.parent.as_ref().and_then(|p| self.nodes.get_key_value(p));
        }
        path
    }

    /// Members without children.
    pub fn leaves(&self) -> impl Iterator<Item = &T> + '_ {
        self.leaves.iter()
    }

    /// The first leaf in enumeration order.
    pub fn first_leaf(&self) -> Option<&T> {
        self.leaves.first()
    }

    /// Remove a leaf.
    ///
    /// Returns `false` if `element` is not a leaf of this tree. When the
    /// pruned leaf was its parent's last child, the parent becomes a leaf.
    pub fn prune(&mut self, element: &T) -> bool {
        if !self.leaves.swap_remove(element) {
            return false;
        }
        let parent = self.nodes.swap_remove(element).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children -= 1;
                if node.children == 0 {
                    self.leaves.insert(parent);
                }
            }
        }
        true
    }

    /// Iterate over every member in discovery order (until pruning
    /// reorders them).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.keys()
    }
}
