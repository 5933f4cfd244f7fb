use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::layer::LayerNode;

/// Arena-based layer forest.
///
/// Owns every [`LayerNode`] of one analysis pass and maps identifiers to
/// arena indices. Parent and child links are plain indices, so the forest
/// can be cloned into a fully independent copy.
#[derive(Debug, Clone, Default)]
pub struct LayerTree {
    /// Arena storage for all layer nodes
    arena: Arena<LayerNode>,
    /// Identifier lookup
    ids: HashMap<String, Index>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached node. A node with the same identifier is removed first.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, node: LayerNode) -> Index {
        if let Some(previous) = self.ids.get(node.identifier()).copied() {
            self.remove(previous);
        }
        let id = node.identifier().to_string();
        let idx = self.arena.insert(node);
        self.ids.insert(id, idx);
        idx
    }

    pub fn get(&self, idx: Index) -> Option<&LayerNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut LayerNode> {
        self.arena.get_mut(idx)
    }

    pub fn index_of(&self, identifier: &str) -> Option<Index> {
        self.ids.get(identifier).copied()
    }

    pub fn by_id(&self, identifier: &str) -> Option<&LayerNode> {
        self.index_of(identifier).and_then(|idx| self.get(idx))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.ids.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All nodes in arena slot order (insertion order until nodes are removed).
    pub fn iter(&self) -> impl Iterator<Item = (Index, &LayerNode)> {
        self.arena.iter()
    }

    pub fn is_head(&self, idx: Index) -> bool {
        self.get(idx).is_some_and(LayerNode::is_head)
    }

    /// Make `child` the last child of `parent`.
    ///
    /// A child that already has a parent is not detached from it first;
    /// joining it twice leaves it listed under both parents.
    #[instrument(level = "trace", skip(self))]
    pub fn join_parent_child(&mut self, parent: Index, child: Index) {
        if !self.arena.contains(parent) || !self.arena.contains(child) {
            return;
        }
        self.arena[child].parent = Some(parent);
        self.arena[parent].children.push(child);
    }

    /// Detach a node from its parent. Its children stay attached to it, so
    /// the node becomes the root of its own subtree. No-op for heads.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_from_chain(&mut self, idx: Index) {
        let Some(parent) = self.get_mut(idx).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|&c| c != idx);
        }
    }

    /// Detach a node and hand its children over to its former parent.
    ///
    /// Adopted children are appended to the parent's children in their
    /// previous order. Children of a head become heads themselves.
    #[instrument(level = "trace", skip(self))]
    pub fn splice_out(&mut self, idx: Index) {
        let Some(node) = self.get_mut(idx) else {
            return;
        };
        let parent = node.parent;
        let children = std::mem::take(&mut node.children);
        self.remove_from_chain(idx);

        for child in children {
            if let Some(child_node) = self.get_mut(child) {
                child_node.parent = None;
            }
            if let Some(parent) = parent {
                self.join_parent_child(parent, child);
            }
        }
    }

    /// Remove a node from the forest, detaching it from its parent and
    /// turning its children into heads.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, idx: Index) -> Option<LayerNode> {
        self.remove_from_chain(idx);
        let mut node = self.arena.remove(idx)?;
        for child in node.children.drain(..) {
            if let Some(child) = self.get_mut(child) {
                if child.parent == Some(idx) {
                    child.parent = None;
                }
            }
        }
        if self.ids.get(node.identifier()) == Some(&idx) {
            self.ids.remove(node.identifier());
        }
        Some(node)
    }

    /// Follow parent links from `idx` up to the head of its lineage.
    pub fn head_of(&self, idx: Index) -> Option<Index> {
        let mut current = idx;
        loop {
            match self.get(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Depth-first pre-order walk of the subtree rooted at `root`.
    pub fn walk(&self, root: Index) -> SubtreeIterator<'_> {
        SubtreeIterator::new(self, root)
    }

    /// Number of levels in the subtree rooted at `root` (a lone node has depth 1).
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, root: Index) -> usize {
        self.walk(root).map(|(_, depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Sum of the sizes of all nodes in the subtree rooted at `root`.
    pub fn subtree_size(&self, root: Index) -> u64 {
        self.walk(root).map(|(_, _, node)| node.size()).sum()
    }
}

/// Pre-order iterator yielding `(index, depth, node)`, the root at depth 0.
pub struct SubtreeIterator<'a> {
    tree: &'a LayerTree,
    stack: Vec<(Index, usize)>,
}

impl<'a> SubtreeIterator<'a> {
    fn new(tree: &'a LayerTree, root: Index) -> Self {
        Self {
            tree,
            stack: vec![(root, 0)],
        }
    }
}

impl<'a> Iterator for SubtreeIterator<'a> {
    type Item = (Index, usize, &'a LayerNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current, depth, node));
            }
        }
        None
    }
}
