//! Evaluation records and reports.
//!
//! Every node and edge instance visited by the converter gets a [`Record`]:
//! whether its own fragment was produced (or composed, for edges) and whether
//! it made it into the final representation. `included` can be downgraded
//! after the fact when an ancestor fails; `produced` never changes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

pub const NODE_PRODUCED: &str = "MRS fragment produced";
pub const EDGE_COMPOSED: &str = "MRS composed";
pub const INCLUDED: &str = "Included in MRS";
pub const OUTBOUND_FROM_FAILED_NODE: &str = "Outbound from failed node";
pub const INBOUND_TO_FAILED_NODE: &str = "Inbound to failed node";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub ok: bool,
    pub reason: String,
}

impl Outcome {
    pub fn success(reason: &str) -> Self {
        Self {
            ok: true,
            reason: reason.to_string(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub produced: Outcome,
    pub included: Outcome,
}

impl Record {
    pub fn node_ok() -> Self {
        Self {
            produced: Outcome::success(NODE_PRODUCED),
            included: Outcome::success(INCLUDED),
        }
    }

    pub fn edge_ok() -> Self {
        Self {
            produced: Outcome::success(EDGE_COMPOSED),
            included: Outcome::success(INCLUDED),
        }
    }

    /// Same reason in both columns.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            produced: Outcome::failure(reason.clone()),
            included: Outcome::failure(reason),
        }
    }
}

/// What made a subtree drop out of the representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Node,
    Edge,
}

impl Failure {
    pub fn reason(self) -> &'static str {
        match self {
            Failure::Node => "Descends from failed node",
            Failure::Edge => "Descends from failed edge",
        }
    }
}

/// Records keyed by instance name (`"{label}_{n}"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalInfo {
    pub nodes: BTreeMap<String, Record>,
    pub edges: BTreeMap<String, Record>,
}

impl EvalInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark everything still included as excluded because of `failure`.
    pub fn cascade(&mut self, failure: Failure) {
        for record in self.nodes.values_mut().chain(self.edges.values_mut()) {
            if record.included.ok {
                record.included = Outcome::failure(failure.reason());
            }
        }
    }

    pub fn merge(&mut self, other: EvalInfo) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    /// Merge records from one graph under `"{graph}_{instance}"` names.
    pub fn merge_prefixed(&mut self, graph: &str, other: &EvalInfo) {
        for (name, record) in &other.nodes {
            self.nodes.insert(format!("{graph}_{name}"), record.clone());
        }
        for (name, record) in &other.edges {
            self.edges.insert(format!("{graph}_{name}"), record.clone());
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            nodes: Coverage::of(self.nodes.values()),
            edges: Coverage::of(self.edges.values()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub produced: usize,
    pub included: usize,
    pub total: usize,
}

impl Coverage {
    fn of<'r>(records: impl Iterator<Item = &'r Record>) -> Self {
        records.fold(Coverage::default(), |mut c, r| {
            c.total += 1;
            c.produced += usize::from(r.produced.ok);
            c.included += usize::from(r.included.ok);
            c
        })
    }

    fn ratio(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }

    pub fn produced_ratio(&self) -> f64 {
        Self::ratio(self.produced, self.total)
    }

    pub fn included_ratio(&self) -> f64 {
        Self::ratio(self.included, self.total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub nodes: Coverage,
    pub edges: Coverage,
}

/// How far one graph got through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub results: usize,
    pub reason: String,
}

impl GenerationInfo {
    pub const CYCLIC: &'static str = "Graph contains cycles";
    pub const NO_ROOT: &'static str = "Graph has no root node";
    pub const NOT_PRODUCED: &'static str = "MRS not produced";
    pub const NO_RESULTS: &'static str = "Generator produced no results";
    pub const GENERATED: &'static str = "Successfully generated";

    pub fn cyclic() -> Self {
        Self::empty(Self::CYCLIC)
    }

    pub fn no_root() -> Self {
        Self::empty(Self::NO_ROOT)
    }

    pub fn not_produced() -> Self {
        Self::empty(Self::NOT_PRODUCED)
    }

    pub fn from_results(results: usize) -> Self {
        if results == 0 {
            Self::empty(Self::NO_RESULTS)
        } else {
            Self {
                results,
                reason: Self::GENERATED.to_string(),
            }
        }
    }

    fn empty(reason: &str) -> Self {
        Self {
            results: 0,
            reason: reason.to_string(),
        }
    }
}

/// Graphs with at least one generated result over all graphs.
pub fn graph_coverage(info: &BTreeMap<String, GenerationInfo>) -> Coverage {
    Coverage {
        produced: info.values().filter(|g| g.results > 0).count(),
        included: info.values().filter(|g| g.results > 0).count(),
        total: info.len(),
    }
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}", w = *w))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_line(&mut out, &cells, &widths);
    }
    out
}

fn record_rows(records: &BTreeMap<String, Record>) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|(name, r)| {
            vec![
                name.clone(),
                r.produced.ok.to_string(),
                r.produced.reason.clone(),
                r.included.ok.to_string(),
                r.included.reason.clone(),
            ]
        })
        .collect()
}

pub fn node_table(info: &EvalInfo) -> String {
    render_table(
        &["Node", "MRS Produced", "Reason", "Included in MRS", "Reason"],
        &record_rows(&info.nodes),
    )
}

pub fn edge_table(info: &EvalInfo) -> String {
    render_table(
        &["Edge", "MRS Composed", "Reason", "Included in MRS", "Reason"],
        &record_rows(&info.edges),
    )
}

pub fn summary_table(summary: &Summary) -> String {
    let row = |component: &str, metric: &str, count: usize, c: &Coverage, ratio: f64| {
        vec![
            component.to_string(),
            metric.to_string(),
            count.to_string(),
            c.total.to_string(),
            format!("{ratio:.3}"),
        ]
    };
    let n = &summary.nodes;
    let e = &summary.edges;
    render_table(
        &["Graph Component", "Metric", "Successful", "Total", "Coverage"],
        &[
            row("Nodes", "Produced", n.produced, n, n.produced_ratio()),
            row("Nodes", "Included", n.included, n, n.included_ratio()),
            row("Edges", "Produced", e.produced, e, e.produced_ratio()),
            row("Edges", "Included", e.included, e, e.included_ratio()),
        ],
    )
}

pub fn generation_table(info: &BTreeMap<String, GenerationInfo>) -> String {
    let rows: Vec<Vec<String>> = info
        .iter()
        .map(|(name, g)| vec![name.clone(), g.results.to_string(), g.reason.clone()])
        .collect();
    render_table(&["Graph Name", "Results", "Reason"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EvalInfo {
        let mut info = EvalInfo::new();
        info.nodes.insert("idApple_1".into(), Record::node_ok());
        info.nodes.insert("idTable_2".into(), Record::failed("Can't find 'idTable' as a key in the lexicon"));
        info.edges.insert("idColor_1".into(), Record::edge_ok());
        info
    }

    #[test]
    fn cascade_only_touches_included_entries() {
        let mut info = sample();
        info.cascade(Failure::Edge);

        let apple = &info.nodes["idApple_1"];
        assert!(apple.produced.ok);
        assert_eq!(apple.included, Outcome::failure("Descends from failed edge"));

        let table = &info.nodes["idTable_2"];
        assert_eq!(table.included.reason, "Can't find 'idTable' as a key in the lexicon");
        assert!(!info.edges["idColor_1"].included.ok);
        assert!(info.edges["idColor_1"].produced.ok);
    }

    #[test]
    fn summary_counts_and_zero_coverage_when_empty() {
        let summary = sample().summary();
        assert_eq!(summary.nodes, Coverage { produced: 1, included: 1, total: 2 });
        assert!((summary.nodes.produced_ratio() - 0.5).abs() < 1e-9);

        let empty = EvalInfo::new().summary();
        assert_eq!(empty.edges.total, 0);
        assert_eq!(empty.edges.included_ratio(), 0.0);
    }

    #[test]
    fn merge_prefixed_names_by_graph() {
        let mut all = EvalInfo::new();
        all.merge_prefixed("kitchen", &sample());
        assert!(all.nodes.contains_key("kitchen_idApple_1"));
        assert!(all.edges.contains_key("kitchen_idColor_1"));
    }

    #[test]
    fn generation_info_reasons() {
        assert_eq!(GenerationInfo::from_results(0).reason, "Generator produced no results");
        assert_eq!(GenerationInfo::from_results(3).results, 3);
        assert_eq!(GenerationInfo::cyclic().reason, "Graph contains cycles");
        assert_eq!(GenerationInfo::no_root().reason, "Graph has no root node");

        let mut graphs = BTreeMap::new();
        graphs.insert("a".to_string(), GenerationInfo::from_results(2));
        graphs.insert("b".to_string(), GenerationInfo::not_produced());
        let c = graph_coverage(&graphs);
        assert_eq!((c.produced, c.total), (1, 2));
    }

    #[test]
    fn tables_are_sorted_by_instance_name() {
        let text = node_table(&sample());
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Node"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("idApple_1"));
        assert!(lines[3].starts_with("idTable_2"));
        assert!(summary_table(&sample().summary()).contains("0.500"));
    }
}
