//! Value, object and label matching used by lookups and traversal steps

use super::edge::Edge;
use super::property::PropertyMap;
use super::types::EdgeLabel;

/// Object-subset match.
///
/// Every key of `filter` must be present in `target` with an equal value.
/// Extra keys on the target are ignored and an empty filter matches anything.
pub fn object_filter(target: &PropertyMap, filter: &PropertyMap) -> bool {
    filter
        .iter()
        .all(|(key, expected)| target.get(key) == Some(expected))
}

/// Which edges a traversal step may follow
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EdgeFilter {
    /// Every edge
    #[default]
    Any,
    /// Exact label equality
    Label(EdgeLabel),
    /// Label membership
    Labels(Vec<EdgeLabel>),
    /// Object-subset match on the edge's properties
    Properties(PropertyMap),
}

impl EdgeFilter {
    pub fn matches(&self, edge: &Edge) -> bool {
        match self {
            EdgeFilter::Any => true,
            EdgeFilter::Label(label) => edge.label == *label,
            EdgeFilter::Labels(labels) => labels.contains(&edge.label),
            EdgeFilter::Properties(filter) => object_filter(&edge.properties, filter),
        }
    }
}

impl From<&str> for EdgeFilter {
    fn from(label: &str) -> Self {
        EdgeFilter::Label(EdgeLabel::new(label))
    }
}

impl From<String> for EdgeFilter {
    fn from(label: String) -> Self {
        EdgeFilter::Label(EdgeLabel::new(label))
    }
}

impl From<Vec<&str>> for EdgeFilter {
    fn from(labels: Vec<&str>) -> Self {
        EdgeFilter::Labels(labels.into_iter().map(EdgeLabel::new).collect())
    }
}

impl From<PropertyMap> for EdgeFilter {
    fn from(filter: PropertyMap) -> Self {
        EdgeFilter::Properties(filter)
    }
}
