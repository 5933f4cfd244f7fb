//! Tree builder linking flat layer records into a forest.

use tracing::{debug, instrument};

use crate::domain::arena::LayerTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::layer::{LayerNode, RawLayer};

/// Constructs a [`LayerTree`] from a snapshot of layer records.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the forest in two passes, since children may precede their
    /// parents in the record list.
    ///
    /// A repeated identifier replaces the earlier node; only the last record
    /// for an identifier is linked. Fails with [`DomainError::MissingParent`]
    /// when a record names a parent that is not part of the same snapshot.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: &[RawLayer]) -> DomainResult<LayerTree> {
        let mut tree = LayerTree::new();

        // Node pass
        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            let node = LayerNode::new(record.id.as_str())?
                .with_tags(record.tags())
                .with_size(record.reported_size());
            inserted.push(tree.insert(node));
        }

        // Link pass, skipping records whose node was replaced
        for (record, &child) in records.iter().zip(&inserted) {
            if !record.has_parent() || tree.index_of(&record.id) != Some(child) {
                continue;
            }
            let parent = tree
                .index_of(&record.parent_id)
                .ok_or_else(|| DomainError::MissingParent {
                    layer: record.id.clone(),
                    parent: record.parent_id.clone(),
                })?;
            tree.join_parent_child(parent, child);
        }

        debug!("built layer tree with {} nodes", tree.len());
        Ok(tree)
    }
}
