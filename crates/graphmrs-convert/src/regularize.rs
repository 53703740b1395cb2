//! Label regularization for scene-graph exports.
//!
//! Instances of one entity type carry a numeric suffix (`idApple1`,
//! `idApple2`) and property edges carry their owner (`idApple1_prop_idColor`).
//! Both are trimmed back to the lexicon key. Labels that don't follow the
//! convention pass through unchanged. Node labels spelled like a predicate
//! skip the lexicon altogether.

use regex::Regex;
use std::sync::OnceLock;

fn node_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(id[A-Za-z]+)[0-9]+$").unwrap())
}

fn edge_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"prop_([A-Za-z]+)").unwrap())
}

fn predicate_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^_?[0-9A-Za-z-]+_[0-9A-Za-z]+_[0-9A-Za-z]+$").unwrap())
}

/// Whether a node label is already a grammar predicate (`_cookie_n_1`) and
/// can be built without a lexicon entry.
pub fn looks_like_predicate(label: &str) -> bool {
    predicate_pattern().is_match(label)
}

pub fn regularize_node(label: &str) -> String {
    node_pattern()
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| label.to_string())
}

pub fn regularize_edge(label: &str) -> String {
    edge_pattern()
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| label.to_string())
}
