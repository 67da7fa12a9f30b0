//! Forest of discovery trees rooted at drainage seeds.

use indexmap::IndexMap;
use tarn_core::CornerId;
use tarn_graph::Lineage;

/// One [`Lineage`] per seed corner, plus an index from every tracked
/// corner to the tree that owns it.
///
/// The priority flood links each newly reached corner under the corner it
/// was reached from, so [`path_to_root`](Self::path_to_root) yields the
/// exact route water would take back out to a seed.
#[derive(Clone, Debug, Default)]
pub struct PathTracker {
    trees: Vec<Lineage<CornerId>>,
    owner: IndexMap<CornerId, usize>,
}

impl PathTracker {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new tree at `corner`.
    ///
    /// Returns `false` if the corner is already tracked.
    pub fn add_root(&mut self, corner: CornerId) -> bool {
        if self.owner.contains_key(&corner) {
            return false;
        }
        self.owner.insert(corner, self.trees.len());
        self.trees.push(Lineage::new(corner));
        true
    }

    /// Attach `child` under `parent` in the parent's tree.
    ///
    /// A no-op returning `false` when the parent is untracked or the child
    /// is already tracked.
    pub fn link(&mut self, child: CornerId, parent: CornerId) -> bool {
        if self.owner.contains_key(&child) {
            return false;
        }
        let Some(&tree) = self.owner.get(&parent) else {
            return false;
        };
        if !self.trees[tree].link(&parent, child) {
            return false;
        }
        self.owner.insert(child, tree);
        true
    }

    /// Whether `corner` belongs to any tree.
    pub fn contains(&self, corner: CornerId) -> bool {
        self.owner.contains_key(&corner)
    }

    /// Route from `corner` back to its seed, both ends included.
    ///
    /// Empty when the corner is untracked.
    pub fn path_to_root(&self, corner: CornerId) -> Vec<CornerId> {
        self.owner
            .get(&corner)
            .map(|&tree| self.trees[tree].root_path(&corner))
            .unwrap_or_default()
    }

    /// Number of trees.
    pub fn roots(&self) -> usize {
        self.trees.len()
    }

    /// Number of tracked corners across every tree.
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    /// Whether no corner is tracked.
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }
}
