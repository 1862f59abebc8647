use serde::Serialize;

use crate::config::DisplayConfig;
use crate::core::PackageKey;
use crate::graph::{DepGraph, GraphEdge};

/// Widget-ready rendition of the graph: display attributes on the nodes,
/// key-to-key edges, and the render options the widget should apply.
#[derive(Debug, Serialize)]
pub struct GraphPayload {
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<GraphEdge>,
    pub config: DisplayConfig,
}

#[derive(Debug, Serialize)]
pub struct PayloadNode {
    pub id: PackageKey,
    pub label: String,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

pub fn render_payload(graph: &DepGraph, config: &DisplayConfig) -> GraphPayload {
    let mut nodes: Vec<PayloadNode> = graph
        .nodes()
        .map(|node| PayloadNode {
            id: node.id.clone(),
            label: node.label.clone(),
            size: node.size,
            color: node
                .highlight
                .then(|| config.highlight_color.clone()),
        })
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let mut edges = graph.edges();
    edges.sort_by(|a, b| a.source.cmp(&b.source).then(a.target.cmp(&b.target)));

    GraphPayload {
        nodes,
        edges,
        config: config.clone(),
    }
}

pub fn render_dot(graph: &DepGraph) -> String {
    let mut out = String::from("digraph pipgraph {\n");

    let mut nodes: Vec<(&PackageKey, &str)> = graph
        .nodes()
        .map(|node| (&node.id, node.label.as_str()))
        .collect();
    nodes.sort_by(|a, b| a.0.cmp(b.0));
    for (id, label) in nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            id.as_str(),
            escape_dot_label(label)
        ));
    }

    let mut edges = graph.edges();
    edges.sort_by(|a, b| a.source.cmp(&b.source).then(a.target.cmp(&b.target)));
    for edge in edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            edge.source.as_str(),
            edge.target.as_str()
        ));
    }

    out.push_str("}\n");
    out
}

/// Terminal tree from the graph's roots (nodes nothing depends on). When
/// every node sits inside a cycle there are no roots, so all nodes are
/// used instead and the cycle marker cuts the recursion.
pub fn render_tree(graph: &DepGraph) -> String {
    let mut roots: Vec<PackageKey> = graph
        .nodes()
        .filter(|node| graph.predecessors(&node.id).is_empty())
        .map(|node| node.id.clone())
        .collect();
    if roots.is_empty() {
        roots = graph.nodes().map(|node| node.id.clone()).collect();
    }
    roots.sort();

    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(label_for(graph, root));
        out.push('\n');
        let mut path = Vec::new();
        render_tree_children(graph, root, "", &mut path, &mut out);
    }
    out
}

fn render_tree_children(
    graph: &DepGraph,
    node: &PackageKey,
    prefix: &str,
    path: &mut Vec<PackageKey>,
    out: &mut String,
) {
    let mut children = graph.successors(node);
    children.sort();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(label_for(graph, child));
        if path.iter().any(|id| id == child) {
            out.push_str(" (cycle)");
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(graph, child, &next_prefix, path, out);
        path.pop();
    }
}

fn label_for<'a>(graph: &'a DepGraph, key: &'a PackageKey) -> &'a str {
    graph
        .node(key)
        .map(|node| node.label.as_str())
        .unwrap_or_else(|| key.as_str())
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
