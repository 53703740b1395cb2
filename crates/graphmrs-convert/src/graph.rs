//! Input scene graphs.
//!
//! ```json
//! { "root": "idApple1",
//!   "nodes": ["idApple1", "red"],
//!   "edges": [ { "source": "idApple1", "target": "red", "label": "idApple1_prop_idColor" } ] }
//! ```
//!
//! `root` is optional; without it the first node with no incoming edge is the
//! root. Nodes that only appear as edge endpoints are added implicitly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_file, ConvertError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let graph: SceneGraph = serde_json::from_str(text).map_err(|source| ConvertError::Json {
            what: "graph".to_string(),
            source,
        })?;
        Ok(graph.with_implicit_nodes())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = read_file(path)?;
        let graph: SceneGraph = serde_json::from_str(&text).map_err(|source| ConvertError::Json {
            what: path.display().to_string(),
            source,
        })?;
        Ok(graph.with_implicit_nodes())
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        let node = node.into();
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) {
        let edge = GraphEdge {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        };
        self.add_node(edge.source.clone());
        self.add_node(edge.target.clone());
        self.edges.push(edge);
    }

    fn with_implicit_nodes(mut self) -> Self {
        let endpoints: Vec<String> = self
            .edges
            .iter()
            .flat_map(|e| [e.source.clone(), e.target.clone()])
            .collect();
        for node in endpoints {
            self.add_node(node);
        }
        self
    }

    /// Outgoing edges of `node`, one per distinct target, in insertion order.
    /// When several edges join the same pair, the first one wins.
    pub fn successors<'g>(&'g self, node: &str) -> Vec<&'g GraphEdge> {
        let mut seen = BTreeSet::new();
        self.edges
            .iter()
            .filter(|e| e.source == node && seen.insert(e.target.as_str()))
            .collect()
    }

    pub fn find_root(&self) -> Result<&str> {
        if let Some(root) = &self.root {
            return Ok(root.as_str());
        }
        let targets: BTreeSet<&str> = self.edges.iter().map(|e| e.target.as_str()).collect();
        self.nodes
            .iter()
            .map(String::as_str)
            .find(|n| !targets.contains(n))
            .ok_or(ConvertError::NoRoot)
    }

    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for e in &self.edges {
            adjacency
                .entry(e.source.as_str())
                .or_default()
                .push(e.target.as_str());
        }

        let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
        for start in self.nodes.iter().map(String::as_str) {
            if marks.contains_key(start) {
                continue;
            }
            // Iterative DFS: (node, next child index).
            let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
            marks.insert(start, Mark::Visiting);
            while let Some((node, i)) = stack.pop() {
                let children = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if let Some(&child) = children.get(i) {
                    stack.push((node, i + 1));
                    match marks.get(child) {
                        Some(Mark::Visiting) => return true,
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(child, Mark::Visiting);
                            stack.push((child, 0));
                        }
                    }
                } else {
                    marks.insert(node, Mark::Done);
                }
            }
        }
        false
    }

    /// Root of an acyclic graph, or the reason it can't be converted.
    pub fn checked_root(&self) -> Result<&str> {
        if self.has_cycle() {
            return Err(ConvertError::Cyclic);
        }
        self.find_root()
    }
}
