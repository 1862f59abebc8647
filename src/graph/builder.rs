use crate::core::{PackageKey, PackageRecord};
use crate::error::Result;
use crate::graph::{DepGraph, GraphNode, BASE_NODE_SIZE};

/// Dependency reference whose target key is not among the scanned packages.
/// Expected when a dependency lives outside the scanned universe; never fatal.
#[derive(Debug, Clone)]
pub struct UnresolvedDependency {
    pub from: PackageKey,
    pub to: PackageKey,
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: DepGraph,
    pub unresolved: Vec<UnresolvedDependency>,
}

/// Builds a fresh graph from the package records: one node per record in
/// input order, then one edge per dependency reference that resolves to a
/// known key. Node registration fully precedes edge filtering, so no
/// ordering is assumed between a package and its dependencies' positions.
pub fn build(records: &[PackageRecord]) -> Result<BuildOutcome> {
    let mut graph = DepGraph::new();
    for record in records {
        graph.add_node(GraphNode {
            id: record.key.clone(),
            label: record.name.clone(),
            size: BASE_NODE_SIZE,
            highlight: false,
        })?;
    }

    let mut unresolved = Vec::new();
    for record in records {
        for dep in &record.dependencies {
            if graph.contains(&dep.key) {
                graph.add_edge(&record.key, &dep.key);
            } else {
                unresolved.push(UnresolvedDependency {
                    from: record.key.clone(),
                    to: dep.key.clone(),
                });
            }
        }
    }

    graph.annotate();
    Ok(BuildOutcome { graph, unresolved })
}
