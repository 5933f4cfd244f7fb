//! Rendering of layer subtrees: indented ascii, structured views and box-drawing trees.

use generational_arena::Index;
use serde::Serialize;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::LayerTree;
use crate::domain::size::format_size;

/// Indented ascii listing of the subtree rooted at `root`.
///
/// The root line is `- {node}`, every descendant is prefixed with two spaces
/// per level followed by `|- `. Children appear in join order.
#[instrument(level = "debug", skip(tree))]
pub fn print_tree(tree: &LayerTree, root: Index) -> String {
    let mut out = String::new();
    for (_, depth, node) in tree.walk(root) {
        if depth == 0 {
            out.push_str(&format!("- {}\n", node));
        } else {
            out.push_str(&format!("{}|- {}\n", "  ".repeat(depth), node));
        }
    }
    out
}

/// Ascii listings of several roots, concatenated.
pub fn print_forest(tree: &LayerTree, roots: &[Index]) -> String {
    roots.iter().map(|&root| print_tree(tree, root)).collect()
}

/// Serializable view of a layer and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerView {
    pub id: String,
    pub short_id: String,
    pub tags: Vec<String>,
    pub size: u64,
    pub size_human: String,
    pub children: Vec<LayerView>,
}

impl LayerView {
    /// Build the view of the subtree rooted at `root`, `None` for a stale index.
    pub fn from_tree(tree: &LayerTree, root: Index) -> Option<Self> {
        let node = tree.get(root)?;
        Some(Self {
            id: node.identifier().to_string(),
            short_id: node.short_id().to_string(),
            tags: node.tags().to_vec(),
            size: node.size(),
            size_human: format_size(node.size()),
            children: node
                .children()
                .iter()
                .filter_map(|&child| Self::from_tree(tree, child))
                .collect(),
        })
    }
}

/// Views for several roots, in the given order.
pub fn to_views(tree: &LayerTree, roots: &[Index]) -> Vec<LayerView> {
    roots
        .iter()
        .filter_map(|&root| LayerView::from_tree(tree, root))
        .collect()
}

/// Conversion of a layer subtree into a box-drawing [`termtree::Tree`].
pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: Index) -> Tree<String>;
}

impl TreeNodeConvert for LayerTree {
    fn to_tree_string(&self, root: Index) -> Tree<String> {
        fn build_tree(tree: &LayerTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get(node_idx) {
                for &child_idx in node.children() {
                    if let Some(child) = tree.get(child_idx) {
                        let mut child_tree = Tree::new(child.to_string());
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.get(root) {
            Some(node) => {
                let mut out = Tree::new(node.to_string());
                build_tree(self, root, &mut out);
                out
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
