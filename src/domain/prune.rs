//! Removal of untagged (intermediate) layers.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::LayerTree;

/// Copy of `tree` without untagged layers.
///
/// Each untagged layer is detached from its parent and dropped; its children
/// are not re-linked and become heads of their own subtrees. The input tree
/// is left untouched.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn without_untagged(tree: &LayerTree) -> LayerTree {
    let mut pruned = tree.clone();
    let untagged = untagged_nodes(&pruned);

    for &idx in &untagged {
        pruned.remove_from_chain(idx);
    }
    for &idx in &untagged {
        pruned.remove(idx);
    }

    debug!("removed {} untagged layers", untagged.len());
    pruned
}

/// Copy of `tree` without untagged layers, keeping ancestry intact.
///
/// Children of a removed layer are adopted by its parent, so a tagged image
/// stays below the nearest tagged ancestor.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn without_untagged_spliced(tree: &LayerTree) -> LayerTree {
    let mut pruned = tree.clone();
    let untagged = untagged_nodes(&pruned);

    for &idx in &untagged {
        pruned.splice_out(idx);
        pruned.remove(idx);
    }

    debug!("spliced out {} untagged layers", untagged.len());
    pruned
}

fn untagged_nodes(tree: &LayerTree) -> Vec<Index> {
    tree.iter()
        .filter(|(_, node)| !node.is_tagged())
        .map(|(idx, _)| idx)
        .collect()
}
