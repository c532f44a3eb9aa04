use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coordinate layout of a rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[serde(alias = "rectangular")]
    Rect,
    Radial,
    Clock,
    Unrooted,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Rect => "rect",
            LayoutMode::Radial => "radial",
            LayoutMode::Clock => "clock",
            LayoutMode::Unrooted => "unrooted",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
}

impl FromStr for LayoutMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rect" | "rectangular" => Ok(LayoutMode::Rect),
            "radial" => Ok(LayoutMode::Radial),
            "clock" => Ok(LayoutMode::Clock),
            "unrooted" => Ok(LayoutMode::Unrooted),
            _ => Err(ParseModeError { kind: "layout", value: s.to_string() }),
        }
    }
}

/// Which node attribute measures distance from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceMeasure {
    #[default]
    #[serde(rename = "div")]
    Divergence,
    #[serde(rename = "num_date")]
    NumDate,
}

impl DistanceMeasure {
    /// Attribute key holding the node's value for this measure
    pub fn attr_key(&self) -> &'static str {
        match self {
            DistanceMeasure::Divergence => "div",
            DistanceMeasure::NumDate => "num_date",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DistanceMeasure::NumDate)
    }
}

impl fmt::Display for DistanceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attr_key())
    }
}

impl FromStr for DistanceMeasure {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "div" | "divergence" => Ok(DistanceMeasure::Divergence),
            "num_date" | "date" => Ok(DistanceMeasure::NumDate),
            _ => Err(ParseModeError { kind: "distance measure", value: s.to_string() }),
        }
    }
}

/// A node of a phylogenetic tree with its attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub strain: String,
    #[serde(default)]
    pub attr: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(strain: impl Into<String>) -> Self {
        Self {
            strain: strain.into(),
            attr: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attr.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Numeric value of the node under the given distance measure
    pub fn value(&self, measure: DistanceMeasure) -> Option<f64> {
        self.attr.get(measure.attr_key()).and_then(Value::as_f64)
    }

    /// Pre-order traversal starting at this node
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// All nodes in pre-order, the root first
    pub fn nodes(&self) -> Vec<&TreeNode> {
        self.iter().collect()
    }

    pub fn tips(&self) -> impl Iterator<Item = &TreeNode> {
        self.iter().filter(|n| !n.has_children())
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Publication details attached to an author key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorInfo {
    pub n: Option<f64>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub paper_url: Option<String>,
}

impl AuthorInfo {
    /// Field-by-field read that keeps every well-typed field of a malformed entry.
    fn from_fields(raw: &Value) -> Self {
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        AuthorInfo {
            n: raw.get("n").and_then(Value::as_f64),
            title: text("title"),
            journal: text("journal"),
            paper_url: text("paper_url"),
        }
    }
}

/// Dataset metadata. Author order follows the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub author_info: Map<String, Value>,
}

impl Metadata {
    pub fn add_author(&mut self, author: impl Into<String>, info: &AuthorInfo) {
        let value = serde_json::to_value(info).unwrap_or(Value::Null);
        self.author_info.insert(author.into(), value);
    }

    /// Authors with their typed info; malformed entries are logged and read as empty
    pub fn authors(&self) -> Vec<(&str, AuthorInfo)> {
        self.author_info
            .iter()
            .map(|(author, raw)| {
                let info = serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
                    log::warn!("Malformed author_info entry for '{}': {}", author, e);
                    AuthorInfo::from_fields(raw)
                });
                (author.as_str(), info)
            })
            .collect()
    }
}
