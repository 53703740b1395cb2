//! Composition-type table: how each recipe relates to the graph.
//!
//! Edge recipes say which side of the edge is the functor:
//!
//! - `parent_hole`: the parent has a hole the child plugs ("photos of cakes")
//! - `parent_plug`: the parent plugs a hole in the child ("red apple")
//! - `edge_predicate`: the edge contributes its own predicate, parent as
//!   `ARG1` and child as `ARG2` ("cookie on the plate")
//!
//! Node recipes (composite lexicon entries) say where the head goes:
//! `head_first_node` or `head_second_node`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use graphmrs_algebra::{CompositionError, Recipe};
use serde::{Deserialize, Serialize};

use crate::error::{read_file, ConvertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionType {
    ParentHole,
    ParentPlug,
    EdgePredicate,
    HeadFirstNode,
    HeadSecondNode,
}

/// How an edge recipe is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// `recipe(parent, child)`
    ParentHole,
    /// `recipe(child, parent)`
    ParentPlug,
    /// `recipe(edge, parent, child)`
    EdgePredicate,
}

/// Argument order of a composite node entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrder {
    /// `recipe(head, modifier)`
    HeadFirst,
    /// `recipe(modifier, head)`
    HeadSecond,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositionTable {
    entries: BTreeMap<Recipe, BTreeSet<CompositionType>>,
}

impl Default for CompositionTable {
    fn default() -> Self {
        use CompositionType::*;
        let entries = [
            (Recipe::Adjective, vec![ParentPlug, HeadSecondNode]),
            (Recipe::Compound, vec![ParentPlug, HeadSecondNode]),
            (Recipe::Possessive, vec![ParentPlug]),
            (Recipe::PassiveParticiple, vec![ParentPlug, HeadSecondNode]),
            (Recipe::Descriptor, vec![ParentPlug]),
            (Recipe::Prefix, vec![HeadSecondNode]),
            (Recipe::Quantify, vec![HeadSecondNode]),
            (Recipe::Preposition, vec![EdgePredicate]),
            (Recipe::RelativeDirection, vec![EdgePredicate]),
            (Recipe::Boolean, vec![EdgePredicate]),
        ]
        .into_iter()
        .map(|(recipe, types)| (recipe, types.into_iter().collect()))
        .collect();
        Self { entries }
    }
}

impl CompositionTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| ConvertError::Json {
            what: "composition table".to_string(),
            source,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = read_file(path)?;
        serde_json::from_str(&text).map_err(|source| ConvertError::Json {
            what: path.display().to_string(),
            source,
        })
    }

    pub fn insert(&mut self, recipe: Recipe, types: impl IntoIterator<Item = CompositionType>) {
        self.entries.insert(recipe, types.into_iter().collect());
    }

    pub fn types(&self, recipe: Recipe) -> std::result::Result<&BTreeSet<CompositionType>, CompositionError> {
        self.entries.get(&recipe).ok_or_else(|| {
            CompositionError::Lookup(format!(
                "Can't find '{recipe}' as a key in the composition table"
            ))
        })
    }

    /// First applicable edge mode, in `parent_hole`, `parent_plug`,
    /// `edge_predicate` order.
    pub fn edge_mode(&self, recipe: Recipe) -> std::result::Result<EdgeMode, CompositionError> {
        let types = self.types(recipe)?;
        if types.contains(&CompositionType::ParentHole) {
            Ok(EdgeMode::ParentHole)
        } else if types.contains(&CompositionType::ParentPlug) {
            Ok(EdgeMode::ParentPlug)
        } else if types.contains(&CompositionType::EdgePredicate) {
            Ok(EdgeMode::EdgePredicate)
        } else {
            Err(no_legitimate_type(recipe))
        }
    }

    pub fn node_order(&self, recipe: Recipe) -> std::result::Result<NodeOrder, CompositionError> {
        let types = self.types(recipe)?;
        if types.contains(&CompositionType::HeadFirstNode) {
            Ok(NodeOrder::HeadFirst)
        } else if types.contains(&CompositionType::HeadSecondNode) {
            Ok(NodeOrder::HeadSecond)
        } else {
            Err(no_legitimate_type(recipe))
        }
    }

    pub fn recipes(&self) -> impl Iterator<Item = Recipe> + '_ {
        self.entries.keys().copied()
    }
}

fn no_legitimate_type(recipe: Recipe) -> CompositionError {
    CompositionError::Data(format!("No legitimate composition type for {recipe}"))
}
