//! Domain layer: layer forest and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod layer;
pub mod prune;
pub mod query;
pub mod render;
pub mod size;

pub use arena::{LayerTree, SubtreeIterator};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use layer::{LayerNode, RawLayer, SHORT_ID_LEN, UNTAGGED_SENTINEL};
pub use prune::{without_untagged, without_untagged_spliced};
pub use query::{get_heads, unique_heads};
pub use render::{print_forest, print_tree, to_views, LayerView, TreeNodeConvert};
pub use size::format_size;
