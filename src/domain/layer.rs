//! Layer entities: raw records from the engine and tree nodes built from them

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::size::format_size;

/// Placeholder tag the engine reports for images without a repository tag.
pub const UNTAGGED_SENTINEL: &str = "<none>:<none>";

/// Number of identifier characters shown in textual output.
pub const SHORT_ID_LEN: usize = 12;

/// One image record as reported by the container engine (`/images/json?all=1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLayer {
    #[serde(rename = "Id")]
    pub id: String,
    /// Empty for base layers
    #[serde(rename = "ParentId", default)]
    pub parent_id: String,
    /// The engine sends `null` for dangling images
    #[serde(rename = "RepoTags", default, deserialize_with = "null_as_empty")]
    pub repo_tags: Vec<String>,
    /// Dropped by newer engine API versions in favour of `Size`
    #[serde(rename = "VirtualSize", default, skip_serializing_if = "Option::is_none")]
    pub virtual_size: Option<u64>,
    #[serde(rename = "Size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl RawLayer {
    pub fn new(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            repo_tags: Vec::new(),
            virtual_size: None,
            size: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repo_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.virtual_size = Some(size);
        self
    }

    /// Virtual size if reported, plain size otherwise.
    pub fn reported_size(&self) -> u64 {
        self.virtual_size.or(self.size).unwrap_or(0)
    }

    /// Strip the `sha256:` digest prefix newer engines put on identifiers.
    pub fn normalized(mut self) -> Self {
        self.id = strip_digest(&self.id).to_string();
        self.parent_id = strip_digest(&self.parent_id).to_string();
        self
    }

    /// Repository tags without the untagged sentinel.
    pub fn tags(&self) -> Vec<String> {
        self.repo_tags
            .iter()
            .filter(|tag| tag.as_str() != UNTAGGED_SENTINEL)
            .cloned()
            .collect()
    }

    pub fn has_parent(&self) -> bool {
        !self.parent_id.is_empty()
    }
}

fn strip_digest(id: &str) -> &str {
    id.strip_prefix("sha256:").unwrap_or(id)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tree node in the arena-based layer hierarchy.
///
/// Identifier and size are fixed at construction; tags stay mutable so
/// callers can annotate layers after the tree has been built. Links are
/// arena indices owned by [`crate::domain::LayerTree`], which keeps them
/// consistent in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNode {
    identifier: String,
    tags: Vec<String>,
    size: u64,
    pub(crate) parent: Option<Index>,
    pub(crate) children: Vec<Index>,
}

impl LayerNode {
    pub fn new(identifier: impl Into<String>) -> DomainResult<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(DomainError::MissingIdentifier);
        }
        Ok(Self {
            identifier,
            tags: Vec::new(),
            size: 0,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// First [`SHORT_ID_LEN`] characters of the identifier.
    pub fn short_id(&self) -> &str {
        match self.identifier.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.identifier[..end],
            None => &self.identifier,
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut Vec<String> {
        &mut self.tags
    }

    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn is_head(&self) -> bool {
        self.parent.is_none()
    }

    /// True when the identifier or any tag starts with `prefix`.
    pub fn matches(&self, prefix: &str) -> bool {
        self.identifier.starts_with(prefix) || self.tags.iter().any(|t| t.starts_with(prefix))
    }
}

impl fmt::Display for LayerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Tags: {:?} Size: {}",
            self.short_id(),
            self.tags,
            format_size(self.size)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_identifier_when_constructing_then_errors() {
        assert_eq!(LayerNode::new(""), Err(DomainError::MissingIdentifier));
    }

    #[test]
    fn given_short_identifier_when_truncating_then_keeps_whole_id() {
        let node = LayerNode::new("abc").unwrap();
        assert_eq!(node.short_id(), "abc");
    }

    #[test]
    fn given_null_repo_tags_when_deserializing_then_tags_are_empty() {
        let raw: RawLayer =
            serde_json::from_str(r#"{"Id": "a", "ParentId": "", "RepoTags": null, "VirtualSize": 7}"#)
                .unwrap();
        assert!(raw.repo_tags.is_empty());
        assert_eq!(raw.reported_size(), 7);
    }

    #[test]
    fn given_only_size_field_when_reading_size_then_falls_back_to_it() {
        let raw: RawLayer =
            serde_json::from_str(r#"{"Id": "sha256:a", "ParentId": "sha256:b", "Size": 42}"#).unwrap();
        assert_eq!(raw.reported_size(), 42);
        let raw = raw.normalized();
        assert_eq!(raw.id, "a");
        assert_eq!(raw.parent_id, "b");
    }

    #[test]
    fn given_sentinel_tag_when_filtering_then_it_is_dropped() {
        let raw = RawLayer::new("a", "").with_tags([UNTAGGED_SENTINEL, "app:1"]);
        assert_eq!(raw.tags(), vec!["app:1".to_string()]);
    }
}
