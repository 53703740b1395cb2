//! Lexicon: graph vocabulary to predicates and recipes.
//!
//! ```json
//! {
//!   "entityTypes": {
//!     "idApple": "_apple_n_1",
//!     "idTrashCan": { "composition": "compound",
//!                     "predicates": { "head": "_can_n_1", "modifier": "_trash_n_1" } }
//!   },
//!   "propertyValues": {
//!     "red": { "predicate": "_red_a_1", "kind": "adjective" }
//!   },
//!   "properties": {
//!     "idColor": "adjective",
//!     "onTopOf": { "composition": "preposition",
//!                  "property_predicate": { "predicate_type": "preposition",
//!                                          "predicate_label": "_on_p_loc" } }
//!   }
//! }
//! ```
//!
//! Recipe names and their classification are checked when the lexicon is
//! loaded; missing keys and empty entries are reported per node or edge
//! while converting.

use std::collections::BTreeMap;
use std::path::Path;

use graphmrs_algebra::{
    Composer, CompositionError, EdgeOperand, Fragment, PredicateKind, Properties, Recipe,
    VerbalBranch,
};
use serde::Deserialize;

use crate::error::{read_file, ConvertError, Result};
use crate::table::{CompositionTable, EdgeMode, NodeOrder};

/// Node entry as written in the lexicon file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Predicate(String),
    Literal {
        predicate: String,
        kind: PredicateKind,
        #[serde(default)]
        properties: Properties,
    },
    Composite {
        composition: String,
        predicates: RawParts,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct RawParts {
    head: Box<RawNode>,
    modifier: Box<RawNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawEdge {
    Recipe(String),
    Predicated {
        composition: String,
        property_predicate: RawPropertyPredicate,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct RawPropertyPredicate {
    predicate_type: EdgePredicateType,
    predicate_label: RawLabel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Single(String),
    Pair(VerbalBranch, VerbalBranch),
}

impl RawLabel {
    fn is_empty(&self) -> bool {
        match self {
            RawLabel::Single(predicate) => predicate.is_empty(),
            RawLabel::Pair(when_true, when_false) => {
                branch_is_empty(when_true) || branch_is_empty(when_false)
            }
        }
    }
}

fn branch_is_empty(branch: &VerbalBranch) -> bool {
    match branch {
        VerbalBranch::Plain(predicate) => predicate.is_empty(),
        VerbalBranch::Prefixed(prefix, verb) => prefix.is_empty() || verb.is_empty(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawLexicon {
    #[serde(rename = "entityTypes", default)]
    entity_types: BTreeMap<String, RawNode>,
    #[serde(rename = "propertyValues", default)]
    property_values: BTreeMap<String, RawNode>,
    #[serde(default)]
    properties: BTreeMap<String, RawEdge>,
}

/// Kind of predicate an edge contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePredicateType {
    Noun,
    Adjective,
    Verb,
    Quantifier,
    Preposition,
    Basic,
    BooleanAdjective,
    BooleanPassiveParticiple,
}

impl EdgePredicateType {
    fn literal_kind(self) -> Option<PredicateKind> {
        match self {
            EdgePredicateType::Noun => Some(PredicateKind::Noun),
            EdgePredicateType::Adjective => Some(PredicateKind::Adjective),
            EdgePredicateType::Verb => Some(PredicateKind::Verb),
            EdgePredicateType::Quantifier => Some(PredicateKind::Quantifier),
            EdgePredicateType::Preposition => Some(PredicateKind::Preposition),
            EdgePredicateType::Basic => Some(PredicateKind::Basic),
            EdgePredicateType::BooleanAdjective | EdgePredicateType::BooleanPassiveParticiple => {
                None
            }
        }
    }
}

/// A validated node entry.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    /// A key with no usable value; fails on the node that uses it.
    Empty,
    Literal {
        predicate: String,
        /// `None` means guess from spelling.
        kind: Option<PredicateKind>,
        properties: Properties,
    },
    Composite {
        recipe: Recipe,
        order: NodeOrder,
        head: Box<NodeSpec>,
        modifier: Box<NodeSpec>,
    },
}

/// The predicate an edge contributes to a three-place recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgePredicate {
    Literal { kind: PredicateKind, predicate: String },
    BooleanAdjective { when_true: String, when_false: String },
    BooleanPassiveParticiple { when_true: VerbalBranch, when_false: VerbalBranch },
}

/// A validated edge entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeSpec {
    /// A key with no usable value; fails on the edge that uses it.
    Empty,
    /// A recipe applied to parent and child directly.
    Direct { recipe: Recipe, mode: EdgeMode },
    WithPredicate { recipe: Recipe, predicate: EdgePredicate },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entity_types: BTreeMap<String, NodeSpec>,
    property_values: BTreeMap<String, NodeSpec>,
    properties: BTreeMap<String, EdgeSpec>,
}

impl Lexicon {
    pub fn from_json_str(text: &str, table: &CompositionTable) -> Result<Self> {
        let raw: RawLexicon = serde_json::from_str(text).map_err(|source| ConvertError::Json {
            what: "lexicon".to_string(),
            source,
        })?;
        Self::from_raw(raw, table)
    }

    pub fn from_json_file(path: &Path, table: &CompositionTable) -> Result<Self> {
        let text = read_file(path)?;
        let raw: RawLexicon = serde_json::from_str(&text).map_err(|source| ConvertError::Json {
            what: path.display().to_string(),
            source,
        })?;
        Self::from_raw(raw, table)
    }

    fn from_raw(raw: RawLexicon, table: &CompositionTable) -> Result<Self> {
        let mut lexicon = Lexicon::default();
        for (key, node) in raw.entity_types {
            let spec = node_spec(&key, node, table)?;
            lexicon.entity_types.insert(key, spec);
        }
        for (key, node) in raw.property_values {
            let spec = node_spec(&key, node, table)?;
            lexicon.property_values.insert(key, spec);
        }
        for (key, edge) in raw.properties {
            let spec = edge_spec(&key, edge, table)?;
            lexicon.properties.insert(key, spec);
        }
        Ok(lexicon)
    }

    pub fn node_count(&self) -> usize {
        self.entity_types.len() + self.property_values.len()
    }

    pub fn edge_count(&self) -> usize {
        self.properties.len()
    }

    /// Entity types first, then property values.
    pub fn node(&self, key: &str) -> std::result::Result<&NodeSpec, CompositionError> {
        self.entity_types
            .get(key)
            .or_else(|| self.property_values.get(key))
            .ok_or_else(|| missing_key(key))
    }

    pub fn edge(&self, key: &str) -> std::result::Result<&EdgeSpec, CompositionError> {
        self.properties.get(key).ok_or_else(|| missing_key(key))
    }
}

fn missing_key(key: &str) -> CompositionError {
    CompositionError::Lookup(format!("Can't find '{key}' as a key in the lexicon"))
}

fn empty_entry(key: &str) -> CompositionError {
    CompositionError::Data(format!("'{key}' has no value in the lexicon"))
}

fn invalid(key: &str, reason: impl Into<String>) -> ConvertError {
    ConvertError::InvalidLexicon {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_recipe(key: &str, name: &str) -> Result<Recipe> {
    name.parse::<Recipe>()
        .map_err(|err| invalid(key, err.to_string()))
}

fn node_spec(key: &str, node: RawNode, table: &CompositionTable) -> Result<NodeSpec> {
    match node {
        RawNode::Predicate(predicate) if predicate.is_empty() => Ok(NodeSpec::Empty),
        RawNode::Literal { predicate, .. } if predicate.is_empty() => Ok(NodeSpec::Empty),
        RawNode::Composite { composition, .. } if composition.is_empty() => Ok(NodeSpec::Empty),
        RawNode::Predicate(predicate) => Ok(NodeSpec::Literal {
            predicate,
            kind: None,
            properties: Properties::new(),
        }),
        RawNode::Literal {
            predicate,
            kind,
            properties,
        } => Ok(NodeSpec::Literal {
            predicate,
            kind: Some(kind),
            properties,
        }),
        RawNode::Composite {
            composition,
            predicates,
        } => {
            let recipe = parse_recipe(key, &composition)?;
            if recipe.needs_edge_operand() {
                return Err(invalid(
                    key,
                    format!("recipe '{recipe}' needs an edge predicate and can't build a node"),
                ));
            }
            let order = table
                .node_order(recipe)
                .map_err(|err| invalid(key, err.to_string()))?;
            Ok(NodeSpec::Composite {
                recipe,
                order,
                head: Box::new(node_spec(key, *predicates.head, table)?),
                modifier: Box::new(node_spec(key, *predicates.modifier, table)?),
            })
        }
    }
}

fn edge_spec(key: &str, edge: RawEdge, table: &CompositionTable) -> Result<EdgeSpec> {
    match edge {
        RawEdge::Recipe(name) if name.is_empty() => Ok(EdgeSpec::Empty),
        RawEdge::Predicated {
            composition,
            property_predicate,
        } if composition.is_empty() || property_predicate.predicate_label.is_empty() => {
            Ok(EdgeSpec::Empty)
        }
        RawEdge::Recipe(name) => {
            let recipe = parse_recipe(key, &name)?;
            let mode = table
                .edge_mode(recipe)
                .map_err(|err| invalid(key, err.to_string()))?;
            if mode == EdgeMode::EdgePredicate || recipe.needs_edge_operand() {
                return Err(invalid(
                    key,
                    format!("recipe '{recipe}' needs a property_predicate"),
                ));
            }
            Ok(EdgeSpec::Direct { recipe, mode })
        }
        RawEdge::Predicated {
            composition,
            property_predicate,
        } => {
            let recipe = parse_recipe(key, &composition)?;
            let mode = table
                .edge_mode(recipe)
                .map_err(|err| invalid(key, err.to_string()))?;
            if mode != EdgeMode::EdgePredicate {
                return Err(invalid(
                    key,
                    format!("recipe '{recipe}' is not classified as edge_predicate"),
                ));
            }
            let predicate = edge_predicate(key, property_predicate)?;
            let boolean = matches!(
                predicate,
                EdgePredicate::BooleanAdjective { .. } | EdgePredicate::BooleanPassiveParticiple { .. }
            );
            if boolean != (recipe == Recipe::Boolean) {
                return Err(invalid(
                    key,
                    format!("recipe '{recipe}' doesn't match its predicate_type"),
                ));
            }
            Ok(EdgeSpec::WithPredicate { recipe, predicate })
        }
    }
}

fn edge_predicate(key: &str, raw: RawPropertyPredicate) -> Result<EdgePredicate> {
    match (raw.predicate_type, raw.predicate_label) {
        (EdgePredicateType::BooleanAdjective, RawLabel::Pair(t, f)) => match (t, f) {
            (VerbalBranch::Plain(when_true), VerbalBranch::Plain(when_false)) => {
                Ok(EdgePredicate::BooleanAdjective {
                    when_true,
                    when_false,
                })
            }
            _ => Err(invalid(key, "boolean adjectives can't take a prefix")),
        },
        (EdgePredicateType::BooleanPassiveParticiple, RawLabel::Pair(when_true, when_false)) => {
            Ok(EdgePredicate::BooleanPassiveParticiple {
                when_true,
                when_false,
            })
        }
        (ty, RawLabel::Single(predicate)) => match ty.literal_kind() {
            Some(kind) => Ok(EdgePredicate::Literal { kind, predicate }),
            None => Err(invalid(key, "boolean predicate_label must be a [true, false] pair")),
        },
        (_, RawLabel::Pair(..)) => Err(invalid(
            key,
            "only boolean predicate types take a [true, false] pair",
        )),
    }
}

impl NodeSpec {
    /// An untagged literal predicate with no properties.
    pub fn literal(predicate: impl Into<String>) -> Self {
        NodeSpec::Literal {
            predicate: predicate.into(),
            kind: None,
            properties: Properties::new(),
        }
    }

    /// Build the fragment for this entry. `key` is only used in messages.
    pub fn realize(&self, key: &str, composer: &mut Composer<'_>) -> std::result::Result<Fragment, CompositionError> {
        match self {
            NodeSpec::Empty => Err(empty_entry(key)),
            NodeSpec::Literal {
                predicate,
                kind,
                properties,
            } => {
                let kind = kind.unwrap_or_else(|| PredicateKind::guess(predicate));
                composer.build_kind(kind, predicate, properties.clone())
            }
            NodeSpec::Composite {
                recipe,
                order,
                head,
                modifier,
            } => {
                let head = head.realize(key, composer)?;
                let modifier = modifier.realize(key, composer)?;
                match order {
                    NodeOrder::HeadFirst => composer.apply(*recipe, &head, &modifier),
                    NodeOrder::HeadSecond => composer.apply(*recipe, &modifier, &head),
                }
            }
        }
    }
}

impl EdgePredicate {
    pub fn realize(&self, composer: &mut Composer<'_>) -> std::result::Result<EdgeOperand, CompositionError> {
        match self {
            EdgePredicate::Literal { kind, predicate } => Ok(EdgeOperand::Fragment(
                composer.build_kind(*kind, predicate, Properties::new())?,
            )),
            EdgePredicate::BooleanAdjective {
                when_true,
                when_false,
            } => composer
                .boolean_adjective(when_true, when_false, Properties::new())
                .map(EdgeOperand::Boolean),
            EdgePredicate::BooleanPassiveParticiple {
                when_true,
                when_false,
            } => composer
                .boolean_passive_participle(when_true, when_false, Properties::new())
                .map(EdgeOperand::Boolean),
        }
    }
}

impl EdgeSpec {
    /// Compose `parent` and `child` across an edge labelled `key`.
    pub fn compose(
        &self,
        key: &str,
        composer: &mut Composer<'_>,
        parent: &Fragment,
        child: &Fragment,
    ) -> std::result::Result<Fragment, CompositionError> {
        match self {
            EdgeSpec::Empty => Err(empty_entry(key)),
            EdgeSpec::Direct { recipe, mode } => match mode {
                EdgeMode::ParentHole => composer.apply(*recipe, parent, child),
                _ => composer.apply(*recipe, child, parent),
            },
            EdgeSpec::WithPredicate { recipe, predicate } => {
                let operand = predicate.realize(composer)?;
                composer.apply_with_edge(*recipe, &operand, parent, child)
            }
        }
    }
}
