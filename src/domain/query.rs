//! Head lookup over a built layer forest.

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::LayerTree;

/// Heads of the forest, or of the lineages matching an image prefix.
///
/// Without a filter every parentless node is returned in arena order. With a
/// filter, every node whose identifier or one of whose tags starts with it
/// contributes the head of its lineage. Several matches below the same head
/// yield that head several times; see [`unique_heads`].
#[instrument(level = "debug", skip(tree))]
pub fn get_heads(tree: &LayerTree, filter: Option<&str>) -> Vec<Index> {
    let heads: Vec<Index> = match filter {
        None | Some("") => tree
            .iter()
            .filter(|(_, node)| node.is_head())
            .map(|(idx, _)| idx)
            .collect(),
        Some(prefix) => tree
            .iter()
            .filter(|(_, node)| node.matches(prefix))
            .filter_map(|(idx, _)| tree.head_of(idx))
            .collect(),
    };
    debug!("found {} heads", heads.len());
    heads
}

/// Drop repeated heads, keeping the first occurrence.
pub fn unique_heads(heads: Vec<Index>) -> Vec<Index> {
    heads.into_iter().unique().collect()
}
