//! Layer analysis service
//!
//! Fetches the layer list from a source, builds the forest and renders the
//! requested view of it.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    get_heads, print_forest, to_views, unique_heads, without_untagged, without_untagged_spliced,
    LayerTree, TreeBuilder, TreeNodeConvert,
};
use crate::infrastructure::traits::LayerSource;

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented `- ` / `|- ` listing
    #[default]
    Ascii,
    /// Nested JSON records
    Json,
    /// Box-drawing tree
    Tree,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Ascii => "ascii",
            OutputFormat::Json => "json",
            OutputFormat::Tree => "tree",
        };
        f.write_str(name)
    }
}

/// What to show from one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Identifier or tag prefix; `None` shows the whole forest
    pub image: Option<String>,
    /// Keep untagged intermediate layers
    pub intermediate: bool,
    /// Re-link children of pruned layers to the nearest kept ancestor;
    /// ignored with `intermediate`, since nothing is pruned then
    pub splice: bool,
    pub format: OutputFormat,
}

/// Service turning a layer source into rendered layer trees.
pub struct AnalysisService {
    source: Arc<dyn LayerSource>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn LayerSource>) -> Self {
        Self { source }
    }

    /// Fetch all layers and link them into a forest.
    #[instrument(level = "debug", skip(self))]
    pub fn analyze(&self) -> ApplicationResult<LayerTree> {
        let records = self
            .source
            .fetch()
            .with_context("fetch layers", &self.source.describe())?;
        info!("fetched {} layers from {}", records.len(), self.source.describe());
        Ok(TreeBuilder::new().build(&records)?)
    }

    /// The forest to display and the heads to display it from.
    ///
    /// Untagged layers are pruned unless `options.intermediate` is set. Heads
    /// are deduplicated; a prefix matching nothing is an error.
    #[instrument(level = "debug", skip(self))]
    pub fn select(&self, options: &AnalysisOptions) -> ApplicationResult<(LayerTree, Vec<Index>)> {
        let tree = self.analyze()?;
        let tree = match (options.intermediate, options.splice) {
            (true, _) => tree,
            (false, false) => without_untagged(&tree),
            (false, true) => without_untagged_spliced(&tree),
        };

        let heads = unique_heads(get_heads(&tree, options.image.as_deref()));
        debug!("selected {} heads", heads.len());
        if let Some(image) = options.image.as_deref().filter(|i| !i.is_empty()) {
            if heads.is_empty() {
                return Err(ApplicationError::NoMatch(image.to_string()));
            }
        }
        Ok((tree, heads))
    }

    /// Render the selected trees in the requested format.
    pub fn report(&self, options: &AnalysisOptions) -> ApplicationResult<String> {
        let (tree, heads) = self.select(options)?;
        render(&tree, &heads, options.format)
    }
}

/// Render the subtrees below `heads` in `format`.
pub fn render(tree: &LayerTree, heads: &[Index], format: OutputFormat) -> ApplicationResult<String> {
    match format {
        OutputFormat::Ascii => Ok(print_forest(tree, heads)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&to_views(tree, heads)).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize layer tree".to_string(),
                    source: Box::new(e),
                }
            })?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Tree => Ok(heads
            .iter()
            .map(|&head| tree.to_tree_string(head).to_string())
            .collect()),
    }
}
