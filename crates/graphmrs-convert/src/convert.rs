//! Graph-to-fragment conversion.
//!
//! The traversal is depth-first from the root. Each node is built from the
//! lexicon, each child subtree is converted first and then attached across its
//! edge. A failure anywhere is recorded on the node or edge where it happened
//! and the traversal carries on, so one unknown word costs only its own
//! subtree.
//!
//! Instance names are `"{label}_{n}"`, with one node counter and one edge
//! counter threaded through the whole traversal. The node counter is bumped
//! on entry (pre-order); the edge counter after the child returns.

use graphmrs_algebra::{Composer, CompositionError, Fragment};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::evaluation::{
    EvalInfo, Failure, Record, INBOUND_TO_FAILED_NODE, OUTBOUND_FROM_FAILED_NODE,
};
use crate::graph::SceneGraph;
use crate::lexicon::{Lexicon, NodeSpec};
use crate::regularize::{looks_like_predicate, regularize_edge, regularize_node};

/// Result of converting one (sub)graph.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// `None` when the root itself couldn't be built.
    pub fragment: Option<Fragment>,
    pub eval: EvalInfo,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Convert an acyclic graph from its root. Cyclic graphs are rejected whole.
pub fn convert_graph(
    graph: &SceneGraph,
    lexicon: &Lexicon,
    composer: &mut Composer<'_>,
) -> Result<Conversion> {
    let root = graph.checked_root()?;
    Ok(convert_node(root, graph, lexicon, composer, 0, 0))
}

/// Convert, then finish the root fragment into a complete representation.
pub fn convert_and_finish(
    graph: &SceneGraph,
    lexicon: &Lexicon,
    composer: &mut Composer<'_>,
) -> Result<(Option<Fragment>, EvalInfo)> {
    let conversion = convert_graph(graph, lexicon, composer)?;
    let finished = composer.finish_opt(conversion.fragment.as_ref())?;
    Ok((finished, conversion.eval))
}

/// Convert the subgraph under `node`.
///
/// Counters come in as the values used so far and go out updated.
pub fn convert_node(
    node: &str,
    graph: &SceneGraph,
    lexicon: &Lexicon,
    composer: &mut Composer<'_>,
    node_count: usize,
    edge_count: usize,
) -> Conversion {
    let mut node_count = node_count + 1;
    let mut edge_count = edge_count;

    let key = regularize_node(node);
    let name = format!("{key}_{node_count}");
    let mut eval = EvalInfo::new();

    let mut current = match build_node(&key, lexicon, composer) {
        Ok(fragment) => {
            debug!(node = %name, "built node fragment");
            eval.nodes.insert(name, Record::node_ok());
            Some(fragment)
        }
        Err(err) => {
            warn!(node = %name, error = %err, "node not produced");
            eval.nodes.insert(name, Record::failed(err.to_string()));
            None
        }
    };

    for edge in graph.successors(node) {
        let child = convert_node(&edge.target, graph, lexicon, composer, node_count, edge_count);
        node_count = child.node_count;
        edge_count = child.edge_count + 1;

        let edge_key = regularize_edge(&edge.label);
        let edge_name = format!("{edge_key}_{edge_count}");
        let mut child_eval = child.eval;

        let failure = match (current.as_ref(), child.fragment.as_ref()) {
            (None, _) => {
                debug!(edge = %edge_name, "parent missing, edge skipped");
                eval.edges
                    .insert(edge_name, Record::failed(OUTBOUND_FROM_FAILED_NODE));
                Some(Failure::Node)
            }
            (Some(_), None) => {
                debug!(edge = %edge_name, "child missing, edge skipped");
                eval.edges
                    .insert(edge_name, Record::failed(INBOUND_TO_FAILED_NODE));
                None
            }
            (Some(parent), Some(child_fragment)) => {
                match compose_edge(&edge_key, lexicon, composer, parent, child_fragment) {
                    Ok(composed) => {
                        debug!(edge = %edge_name, "composed edge");
                        eval.edges.insert(edge_name, Record::edge_ok());
                        current = Some(composed);
                        None
                    }
                    Err(err) => {
                        // The parent keeps the fragment it had before this edge.
                        warn!(edge = %edge_name, error = %err, "edge not composed");
                        eval.edges.insert(edge_name, Record::failed(err.to_string()));
                        Some(Failure::Edge)
                    }
                }
            }
        };

        if let Some(failure) = failure {
            child_eval.cascade(failure);
        }
        eval.merge(child_eval);
    }

    Conversion {
        fragment: current,
        eval,
        node_count,
        edge_count,
    }
}

fn build_node(
    key: &str,
    lexicon: &Lexicon,
    composer: &mut Composer<'_>,
) -> std::result::Result<Fragment, CompositionError> {
    if looks_like_predicate(key) {
        return NodeSpec::literal(key).realize(key, composer);
    }
    lexicon.node(key)?.realize(key, composer)
}

fn compose_edge(
    key: &str,
    lexicon: &Lexicon,
    composer: &mut Composer<'_>,
    parent: &Fragment,
    child: &Fragment,
) -> std::result::Result<Fragment, CompositionError> {
    lexicon.edge(key)?.compose(key, composer, parent, child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::table::CompositionTable;
    use crate::test_support::synopses;

    const LEXICON: &str = r#"{
      "entityTypes": {
        "idApple": "_apple_n_1",
        "idCookie": "_cookie_n_1",
        "idPlate": "_plate_n_1",
        "idTable": "_table_n_1"
      },
      "propertyValues": {
        "red": { "predicate": "_red_a_1", "kind": "adjective" },
        "wooden": { "predicate": "_wooden_a_1", "kind": "adjective" },
        "true": "_true_a_of"
      },
      "properties": {
        "idColor": "adjective",
        "idMaterial": "adjective",
        "onTopOf": { "composition": "preposition",
                     "property_predicate": { "predicate_type": "preposition",
                                             "predicate_label": "_on_p_loc" } }
      }
    }"#;

    fn lexicon() -> Lexicon {
        Lexicon::from_json_str(LEXICON, &CompositionTable::default()).expect("lexicon")
    }

    #[test]
    fn red_apple_composes_and_everything_is_included() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idApple1", "red", "idApple1_prop_idColor");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        let fragment = out.fragment.expect("fragment");
        assert_eq!(fragment.predicates().collect::<Vec<_>>(), vec!["_red_a_1", "_apple_n_1"]);
        assert_eq!(out.node_count, 2);
        assert_eq!(out.edge_count, 1);
        assert_eq!(out.eval.nodes["idApple_1"], Record::node_ok());
        assert_eq!(out.eval.nodes["red_2"], Record::node_ok());
        assert_eq!(out.eval.edges["idColor_1"], Record::edge_ok());
    }

    #[test]
    fn unknown_child_marks_edge_inbound_to_failed_node() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idApple1", "blue", "idApple1_prop_idColor");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        let fragment = out.fragment.expect("parent survives");
        assert_eq!(fragment.predicates().collect::<Vec<_>>(), vec!["_apple_n_1"]);
        assert!(!out.eval.nodes["blue_2"].produced.ok);
        assert_eq!(out.eval.edges["idColor_1"], Record::failed("Inbound to failed node"));
    }

    #[test]
    fn predicate_labels_bypass_the_lexicon() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idApple1", "_green_a_1", "idApple1_prop_idColor");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        assert_eq!(out.eval.nodes["_green_a_1_2"], Record::node_ok());
        assert_eq!(out.eval.edges["idColor_1"], Record::edge_ok());
        assert_eq!(
            out.fragment.unwrap().predicates().collect::<Vec<_>>(),
            vec!["_green_a_1", "_apple_n_1"]
        );
    }

    #[test]
    fn failed_edge_cascades_over_child_subtree() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        // `idMood` isn't in the lexicon, so the edge into the table fails and
        // the table's own (successful) subtree is excluded.
        g.add_edge("idApple1", "idTable1", "idApple1_prop_idMood");
        g.add_edge("idTable1", "wooden", "idTable1_prop_idMaterial");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        let table_node = &out.eval.nodes["idTable_2"];
        assert!(table_node.produced.ok);
        assert_eq!(table_node.included.reason, "Descends from failed edge");
        let wooden = &out.eval.nodes["wooden_3"];
        assert!(wooden.produced.ok && !wooden.included.ok);
        let material = &out.eval.edges["idMaterial_1"];
        assert!(material.produced.ok);
        assert_eq!(material.included.reason, "Descends from failed edge");
        let mood = &out.eval.edges["idMood_2"];
        assert_eq!(mood.produced.reason, "Can't find 'idMood' as a key in the lexicon");
        assert_eq!(
            out.fragment.unwrap().predicates().collect::<Vec<_>>(),
            vec!["_apple_n_1"]
        );
    }

    #[test]
    fn failed_root_cascades_with_node_reason() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idGhost1", "red", "idGhost1_prop_idColor");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        assert!(out.fragment.is_none());
        assert_eq!(out.eval.edges["idColor_1"], Record::failed("Outbound from failed node"));
        let red = &out.eval.nodes["red_2"];
        assert!(red.produced.ok);
        assert_eq!(red.included.reason, "Descends from failed node");
    }

    #[test]
    fn counters_thread_through_siblings() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idCookie1", "idPlate1", "onTopOf");
        g.add_edge("idPlate1", "red", "idPlate1_prop_idColor");
        g.add_edge("idCookie1", "wooden", "idCookie1_prop_idMaterial");

        let out = convert_graph(&g, &lexicon(), &mut composer).unwrap();
        let nodes: Vec<_> = out.eval.nodes.keys().cloned().collect();
        assert_eq!(nodes, vec!["idCookie_1", "idPlate_2", "red_3", "wooden_4"]);
        let edges: Vec<_> = out.eval.edges.keys().cloned().collect();
        assert_eq!(edges, vec!["idColor_1", "idMaterial_3", "onTopOf_2"]);
        assert!(out.eval.edges.values().all(|r| r.included.ok));
    }

    #[test]
    fn cyclic_graph_is_rejected() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.root = Some("idApple1".to_string());
        g.add_edge("idApple1", "red", "idColor");
        g.add_edge("red", "idApple1", "idColor");
        assert!(matches!(
            convert_graph(&g, &lexicon(), &mut composer),
            Err(ConvertError::Cyclic)
        ));
    }

    #[test]
    fn finishing_wraps_the_root_fragment() {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let mut g = SceneGraph::new();
        g.add_edge("idApple1", "red", "idApple1_prop_idColor");
        let (finished, _) = convert_and_finish(&g, &lexicon(), &mut composer).unwrap();
        let finished = finished.expect("finished");
        assert!(finished.is_finished());
        assert_eq!(finished.rels[0].predicate, "unknown");
    }
}
