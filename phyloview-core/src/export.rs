//! Tabular (TSV) and topology (Newick) serialisation of a tree and its metadata.

use crate::strings::{format_url_string, is_paper_url_valid, pretty_string, js_number, to_fixed, PrettyOptions};
use crate::types::{DistanceMeasure, Metadata, TreeNode};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub const AUTHOR_TSV_HEADER: [&str; 6] = [
    "Author",
    "n (strains)",
    "publication title",
    "journal",
    "publication URL",
    "strains",
];

/// Columns that always lead the strain table, in this order.
pub const PREFERRED_STRAIN_ATTRS: [&str; 9] = [
    "accession", "date", "region", "country", "division", "authors", "journal", "title", "url",
];

pub const UNKNOWN: &str = "unknown";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewickError {
    #[error("node '{strain}' has no numeric '{attr}' attribute")]
    MissingValue { strain: String, attr: &'static str },
}

/// One TSV row per metadata author: publication details plus the strains the
/// tree attributes to them. Tree authors without metadata are left out.
pub fn author_table(metadata: &Metadata, nodes: &[&TreeNode]) -> String {
    let mut strains_by_author: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes.iter().filter(|n| !n.has_children()) {
        if let Some(author) = node.attr.get("authors").and_then(Value::as_str) {
            if author.is_empty() {
                continue;
            }
            strains_by_author.entry(author).or_default().push(node.strain.as_str());
        }
    }

    let no_comma = PrettyOptions::without_comma();
    let mut lines = vec![AUTHOR_TSV_HEADER.join("\t")];
    for (author, info) in metadata.authors() {
        let strains = strains_by_author.get(author).map(Vec::as_slice).unwrap_or(&[]);
        if strains.is_empty() {
            log::debug!("Author '{}' has no strains in the tree", author);
        }
        let count = info.n.map(js_number).unwrap_or_else(|| strains.len().to_string());
        let url = if is_paper_url_valid(info.paper_url.as_deref()) {
            format_url_string(info.paper_url.as_deref().unwrap_or_default())
        } else {
            UNKNOWN.to_string()
        };
        let row = [
            pretty_string(author, &PrettyOptions::verbatim_case()),
            count,
            pretty_string(info.title.as_deref().unwrap_or_default(), &no_comma),
            pretty_string(info.journal.as_deref().unwrap_or_default(), &no_comma),
            url,
            strains.join(","),
        ];
        lines.push(row.join("\t"));
    }
    lines.join("\n")
}

pub fn include_attribute(name: &str) -> bool {
    !(name.contains("entropy") || name.contains("confidence") || name == "div" || name == "paper_url")
}

/// Preferred columns followed by the remaining includable attributes in `raw_attrs` order
pub fn strain_attribute_columns(raw_attrs: &[String]) -> Vec<String> {
    let mut attrs: Vec<String> = PREFERRED_STRAIN_ATTRS.iter().map(|s| s.to_string()).collect();
    for attr in raw_attrs {
        if !attrs.contains(attr) && include_attribute(attr) {
            attrs.push(attr.clone());
        }
    }
    attrs
}

pub fn header_row(attrs: &[String]) -> Vec<String> {
    let opts = PrettyOptions::default();
    std::iter::once("Strain".to_string())
        .chain(attrs.iter().map(|a| pretty_string(a, &opts)))
        .collect()
}

/// Attribute names across all nodes in first-seen order
pub fn collect_attribute_names(nodes: &[&TreeNode]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for node in nodes {
        for key in node.attr.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn pretty_scalar(value: &Value) -> String {
    match value {
        Value::Number(n) => to_fixed(n.as_f64().unwrap_or(f64::NAN), 2),
        Value::String(s) => pretty_string(s, &PrettyOptions::without_comma()),
        other => pretty_string(&other.to_string(), &PrettyOptions::without_comma()),
    }
}

/// Text for one strain table cell
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) if s.starts_with("http") => format_url_string(s),
        Value::String(s) => pretty_string(s, &PrettyOptions::without_comma()),
        Value::Number(n) => to_fixed(n.as_f64().unwrap_or(f64::NAN), 2),
        Value::Array(items) => {
            let numeric = items.first().map(Value::is_number).unwrap_or(false);
            let parts: Vec<String> = if numeric {
                items
                    .iter()
                    .map(|v| to_fixed(v.as_f64().unwrap_or(f64::NAN), 2))
                    .collect()
            } else {
                items.iter().map(pretty_scalar).collect()
            };
            parts.join(" - ")
        }
        Value::Object(record) => {
            let no_comma = PrettyOptions::without_comma();
            record
                .iter()
                .map(|(k, v)| format!("{}: {};", pretty_string(k, &no_comma), pretty_scalar(v)))
                .collect()
        }
        other => {
            log::warn!("Tried to save {} of unsupported type", other);
            UNKNOWN.to_string()
        }
    }
}

/// One TSV row per tip with the strain name and the selected attributes
pub fn strain_table(nodes: &[&TreeNode], raw_attrs: &[String]) -> String {
    let attrs = strain_attribute_columns(raw_attrs);
    let mut lines = vec![header_row(&attrs).join("\t")];
    for node in nodes.iter().filter(|n| !n.has_children()) {
        let mut line = vec![node.strain.clone()];
        for field in &attrs {
            line.push(match node.attr.get(field) {
                Some(value) => format_cell(value),
                None => UNKNOWN.to_string(),
            });
        }
        lines.push(line.join("\t"));
    }
    lines.join("\n")
}

/// Serialise the tree rooted at `root` as Newick. Branch lengths are the
/// difference between a node's value and its parent's under `measure`.
pub fn to_newick(root: &TreeNode, measure: DistanceMeasure) -> Result<String, NewickError> {
    let root_value = node_value(root, measure)?;
    let mut out = String::new();
    if root.has_children() {
        write_children(&mut out, root, root_value, measure)?;
    }
    out.push_str(&root.strain);
    out.push(';');
    Ok(out)
}

fn node_value(node: &TreeNode, measure: DistanceMeasure) -> Result<f64, NewickError> {
    node.value(measure).ok_or_else(|| NewickError::MissingValue {
        strain: node.strain.clone(),
        attr: measure.attr_key(),
    })
}

fn write_children(out: &mut String, node: &TreeNode, value: f64, measure: DistanceMeasure) -> Result<(), NewickError> {
    out.push('(');
    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_subtree(out, child, value, measure)?;
    }
    out.push(')');
    Ok(())
}

fn write_subtree(out: &mut String, node: &TreeNode, parent_value: f64, measure: DistanceMeasure) -> Result<(), NewickError> {
    let value = node_value(node, measure)?;
    if node.has_children() {
        write_children(out, node, value, measure)?;
    }
    out.push_str(&node.strain);
    out.push(':');
    out.push_str(&js_number(value - parent_value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorInfo;
    use serde_json::json;

    fn star_tree() -> TreeNode {
        TreeNode::new("")
            .with_attr("div", 0.0)
            .with_child(TreeNode::new("A").with_attr("div", 1.0))
            .with_child(TreeNode::new("B").with_attr("div", 2.0))
    }

    #[test]
    fn test_newick_star_tree() {
        assert_eq!(to_newick(&star_tree(), DistanceMeasure::Divergence).unwrap(), "(A:1,B:2);");
    }

    #[test]
    fn test_newick_nested_and_temporal() {
        let tree = TreeNode::new("root")
            .with_attr("num_date", 2000.0)
            .with_child(
                TreeNode::new("n1")
                    .with_attr("num_date", 2001.5)
                    .with_child(TreeNode::new("X").with_attr("num_date", 2003.0))
                    .with_child(TreeNode::new("Y").with_attr("num_date", 2002.0)),
            )
            .with_child(TreeNode::new("Z").with_attr("num_date", 2004.0));
        assert_eq!(
            to_newick(&tree, DistanceMeasure::NumDate).unwrap(),
            "((X:1.5,Y:0.5)n1:1.5,Z:4)root;"
        );
    }

    #[test]
    fn test_newick_missing_value() {
        let tree = TreeNode::new("r").with_attr("div", 0.0).with_child(TreeNode::new("A"));
        let err = to_newick(&tree, DistanceMeasure::Divergence).unwrap_err();
        assert_eq!(err, NewickError::MissingValue { strain: "A".into(), attr: "div" });
    }

    #[test]
    fn test_strain_table_unknown_cells() {
        let tip = TreeNode::new("S1")
            .with_attr("country", "new_zealand")
            .with_attr("div", 0.1)
            .with_attr("lbi", 0.456);
        let nodes = vec![&tip];
        let raw = vec!["country".to_string(), "div".to_string(), "lbi".to_string()];
        let table = strain_table(&nodes, &raw);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[0],
            "Strain\tAccession\tDate\tRegion\tCountry\tDivision\tAuthors\tJournal\tTitle\tUrl\tLbi"
        );
        let cells: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(cells[0], "S1");
        assert_eq!(cells[1], "unknown");
        assert_eq!(cells[4], "New Zealand");
        assert_eq!(cells[10], "0.46");
        assert!(!cells.contains(&""));
    }

    #[test]
    fn test_attribute_exclusion() {
        let raw: Vec<String> = ["country_entropy", "confidence", "div", "paper_url", "clade", "country"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cols = strain_attribute_columns(&raw);
        assert_eq!(cols.len(), PREFERRED_STRAIN_ATTRS.len() + 1);
        assert_eq!(cols.last().map(String::as_str), Some("clade"));
    }

    #[test]
    fn test_format_cell_variants() {
        assert_eq!(format_cell(&json!("https_//x.org")), "https://x.org");
        assert_eq!(format_cell(&json!("Smith, Jones")), "Smith Jones");
        assert_eq!(format_cell(&json!(3)), "3.00");
        assert_eq!(format_cell(&json!([1.234, 2])), "1.23 - 2.00");
        assert_eq!(format_cell(&json!(["a_b", "c"])), "A B - C");
        assert_eq!(format_cell(&json!({"ha1": 0.5, "site": "x"})), "Ha1: 0.50;Site: X;");
        assert_eq!(format_cell(&json!(true)), "unknown");
        assert_eq!(format_cell(&Value::Null), "unknown");
    }

    #[test]
    fn test_format_cell_halfway_values() {
        assert_eq!(format_cell(&json!(0.125)), "0.13");
        assert_eq!(format_cell(&json!([0.375, 1.625])), "0.38 - 1.63");
        assert_eq!(format_cell(&json!({"ep": 0.125})), "Ep: 0.13;");
    }

    #[test]
    fn test_author_table_float_count() {
        let tree = TreeNode::new("root").with_child(TreeNode::new("A").with_attr("authors", "lee"));
        let meta: Metadata = serde_json::from_value(json!({
            "author_info": {"lee": {"n": 2.0, "title": "dengue", "paper_url": "https://doi.org/7"}}
        }))
        .unwrap();
        let table = author_table(&meta, &tree.nodes());
        assert_eq!(table.lines().nth(1), Some("lee\t2\tDengue\t\thttps://doi.org/7\tA"));
    }

    #[test]
    fn test_internal_nodes_skipped_in_strain_table() {
        let tree = star_tree();
        let nodes = tree.nodes();
        let table = strain_table(&nodes, &[]);
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn test_author_table() {
        let tree = TreeNode::new("root")
            .with_child(TreeNode::new("A").with_attr("authors", "smith"))
            .with_child(TreeNode::new("B").with_attr("authors", "smith"))
            .with_child(TreeNode::new("C").with_attr("authors", "unlisted"));
        let mut meta = Metadata::default();
        meta.add_author(
            "smith",
            &AuthorInfo {
                n: Some(2.0),
                title: Some("Flu, again".into()),
                journal: Some("Nature".into()),
                paper_url: Some("https_//doi.org/42".into()),
            },
        );
        meta.add_author("doe", &AuthorInfo { paper_url: Some("?".into()), ..AuthorInfo::default() });
        let nodes = tree.nodes();
        let table = author_table(&meta, &nodes);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], AUTHOR_TSV_HEADER.join("\t"));
        assert_eq!(lines[1], "smith\t2\tFlu Again\tNature\thttps://doi.org/42\tA,B");
        assert_eq!(lines[2], "doe\t0\t\t\tunknown\t");
        assert!(!table.contains("unlisted"));
    }

    #[test]
    fn test_collect_attribute_names() {
        let tree = TreeNode::new("r")
            .with_attr("div", 0)
            .with_child(TreeNode::new("A").with_attr("country", "x").with_attr("div", 1));
        let nodes = tree.nodes();
        assert_eq!(collect_attribute_names(&nodes), vec!["div".to_string(), "country".to_string()]);
    }
}
