//! Named composition recipes.
//!
//! Each recipe fixes which hole is plugged and which operand is the functor
//! for one construction. Recipes only ever call the primitive operators in
//! [`crate::ops`]; they never edit predications.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::composer::Composer;
use crate::error::{CompositionError, Result};
use crate::fragment::{role, Fragment, Properties};
use crate::ops::{non_scopal_shared, non_scopal_unshared, scopal};

/// Closed registry of composition recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipe {
    Adjective,
    Compound,
    Possessive,
    Preposition,
    RelativeDirection,
    PassiveParticiple,
    Descriptor,
    Boolean,
    Prefix,
    Quantify,
}

impl Recipe {
    pub const ALL: [Recipe; 10] = [
        Recipe::Adjective,
        Recipe::Compound,
        Recipe::Possessive,
        Recipe::Preposition,
        Recipe::RelativeDirection,
        Recipe::PassiveParticiple,
        Recipe::Descriptor,
        Recipe::Boolean,
        Recipe::Prefix,
        Recipe::Quantify,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Recipe::Adjective => "adjective",
            Recipe::Compound => "compound",
            Recipe::Possessive => "possessive",
            Recipe::Preposition => "preposition",
            Recipe::RelativeDirection => "relative_direction",
            Recipe::PassiveParticiple => "passive_participle",
            Recipe::Descriptor => "descriptor",
            Recipe::Boolean => "boolean",
            Recipe::Prefix => "prefix",
            Recipe::Quantify => "quantify",
        }
    }

    /// Three-place recipes take an extra operand contributed by the edge.
    pub fn needs_edge_operand(self) -> bool {
        matches!(
            self,
            Recipe::Preposition | Recipe::RelativeDirection | Recipe::Boolean
        )
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Recipe {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self> {
        Recipe::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| CompositionError::Lookup(format!("Unknown composition recipe '{s}'")))
    }
}

/// Part of speech of a literal predicate; decides the index role of its base
/// fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    Noun,
    Adjective,
    Verb,
    Quantifier,
    Preposition,
    Pronoun,
    Basic,
}

impl PredicateKind {
    /// Modifiers index the thing they modify (`ARG1`); everything else its
    /// intrinsic variable.
    pub fn index_role(self) -> &'static str {
        match self {
            PredicateKind::Adjective | PredicateKind::Preposition => role::ARG1,
            _ => role::ARG0,
        }
    }

    /// Guess from the predicate's spelling (`_apple_n_1`, `_red_a_1`, ...).
    /// Only used for untagged lexicon entries.
    pub fn guess(predicate: &str) -> Self {
        let p = patterns();
        if p.noun.is_match(predicate) {
            PredicateKind::Noun
        } else if p.adjective.is_match(predicate) {
            PredicateKind::Adjective
        } else if p.verb.is_match(predicate) {
            PredicateKind::Verb
        } else if p.quantifier.is_match(predicate) {
            PredicateKind::Quantifier
        } else if p.preposition.is_match(predicate) {
            PredicateKind::Preposition
        } else {
            PredicateKind::Basic
        }
    }
}

struct Patterns {
    noun: Regex,
    adjective: Regex,
    verb: Regex,
    quantifier: Regex,
    preposition: Regex,
    verbal_prefix: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        noun: Regex::new(r"^_[A-Za-z]+_n_[0-9A-Za-z]+$").unwrap(),
        adjective: Regex::new(r"^_[A-Za-z-]+_a_[0-9A-Za-z]+$").unwrap(),
        verb: Regex::new(r"^_[A-Za-z]+_v_[0-9A-Za-z]+$").unwrap(),
        quantifier: Regex::new(r"^_[A-Za-z]+_q$").unwrap(),
        preposition: Regex::new(r"^_[A-Za-z+]+_p(_loc)*$").unwrap(),
        verbal_prefix: Regex::new(r"^_[A-Za-z]+_v_").unwrap(),
    })
}

/// Value predicates a boolean-valued edge may point at.
pub const TRUE_PREDICATE: &str = "_true_a_of";
pub const FALSE_PREDICATE: &str = "_false_a_of";

/// The two precomputed branches of a boolean property plus the recipe that
/// attaches the chosen branch to the modified noun.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanOptions {
    pub when_true: Fragment,
    pub when_false: Fragment,
    pub recipe: Recipe,
}

/// One branch of a boolean passive-participle property: a bare verb
/// (`_lock_v_1`) or a prefixed one (`_un-_a_neg` + `_lock_v_1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerbalBranch {
    Plain(String),
    Prefixed(String, String),
}

/// The extra operand of a three-place recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeOperand {
    Fragment(Fragment),
    Boolean(BooleanOptions),
}

impl<'a> Composer<'a> {
    /// Base fragment for a literal predicate of a known kind.
    pub fn build_kind(
        &mut self,
        kind: PredicateKind,
        predicate: &str,
        properties: Properties,
    ) -> Result<Fragment> {
        match kind {
            PredicateKind::Pronoun => self.pronoun(predicate, properties),
            _ => self.build(predicate, properties, kind.index_role()),
        }
    }

    /// `pron` under `pronoun_q`.
    pub fn pronoun(&mut self, predicate: &str, properties: Properties) -> Result<Fragment> {
        let pron = self.build(predicate, properties, role::ARG0)?;
        let quantifier = self.basic("pronoun_q")?;
        scopal(&quantifier, &pron)
    }

    pub fn boolean_adjective(
        &mut self,
        when_true: &str,
        when_false: &str,
        properties: Properties,
    ) -> Result<BooleanOptions> {
        Ok(BooleanOptions {
            when_true: self.build(when_true, properties.clone(), role::ARG1)?,
            when_false: self.build(when_false, properties, role::ARG1)?,
            recipe: Recipe::Adjective,
        })
    }

    pub fn boolean_passive_participle(
        &mut self,
        when_true: &VerbalBranch,
        when_false: &VerbalBranch,
        properties: Properties,
    ) -> Result<BooleanOptions> {
        Ok(BooleanOptions {
            when_true: self.verbal_branch(when_true, properties.clone())?,
            when_false: self.verbal_branch(when_false, properties)?,
            recipe: Recipe::PassiveParticiple,
        })
    }

    fn verbal_branch(&mut self, branch: &VerbalBranch, properties: Properties) -> Result<Fragment> {
        match branch {
            VerbalBranch::Plain(verb) => self.build(verb, properties, role::ARG0),
            VerbalBranch::Prefixed(prefix, verb) => {
                let prefix = self.build(prefix, Properties::new(), role::ARG1)?;
                let verb = self.build(verb, properties, role::ARG0)?;
                self.prefix(&prefix, &verb)
            }
        }
    }

    /// Apply a two-place recipe.
    pub fn apply(&mut self, recipe: Recipe, first: &Fragment, second: &Fragment) -> Result<Fragment> {
        match recipe {
            Recipe::Adjective => self.adjective(first, second),
            Recipe::Compound => self.compound(first, second),
            Recipe::Possessive => self.possessive(first, second),
            Recipe::PassiveParticiple => self.passive_participle(first, second),
            Recipe::Descriptor => self.descriptor(first, second),
            Recipe::Prefix => self.prefix(first, second),
            Recipe::Quantify => self.quantify(first, second),
            Recipe::Preposition | Recipe::RelativeDirection | Recipe::Boolean => {
                Err(CompositionError::Lookup(format!(
                    "Recipe '{recipe}' needs a predicate contributed by the edge"
                )))
            }
        }
    }

    /// Apply a three-place recipe whose first operand comes from the edge.
    pub fn apply_with_edge(
        &mut self,
        recipe: Recipe,
        edge: &EdgeOperand,
        first: &Fragment,
        second: &Fragment,
    ) -> Result<Fragment> {
        match (recipe, edge) {
            (Recipe::Preposition, EdgeOperand::Fragment(prep)) => {
                self.preposition(prep, first, second)
            }
            (Recipe::RelativeDirection, EdgeOperand::Fragment(direction)) => {
                self.relative_direction(direction, first, second)
            }
            (Recipe::Boolean, EdgeOperand::Boolean(options)) => {
                self.boolean(options, first, second)
            }
            (Recipe::Boolean, EdgeOperand::Fragment(_)) => Err(CompositionError::Data(
                "Boolean recipe needs a pair of boolean predicates".to_string(),
            )),
            (_, EdgeOperand::Boolean(_)) => Err(CompositionError::Data(format!(
                "Recipe '{recipe}' can't use a boolean predicate pair"
            ))),
            (_, EdgeOperand::Fragment(_)) => self.apply(recipe, first, second),
        }
    }

    /// "red apple": shared-label on the adjective's `ARG1`.
    pub fn adjective(&mut self, adjective: &Fragment, noun: &Fragment) -> Result<Fragment> {
        non_scopal_shared(adjective, noun, role::ARG1)
    }

    pub fn quantify(&mut self, quantifier: &Fragment, noun: &Fragment) -> Result<Fragment> {
        scopal(quantifier, noun)
    }

    /// Wrap `fragment` in the default quantifier unless it is already quantified.
    pub fn quantify_if_needed(&mut self, fragment: &Fragment) -> Result<Fragment> {
        if fragment.is_quantified() {
            return Ok(fragment.clone());
        }
        let predicate = self.default_quantifier().to_string();
        let quantifier = self.basic(&predicate)?;
        scopal(&quantifier, fragment)
    }

    /// "trash can": implicit `udef_q` over the non-head, joined by `compound`.
    pub fn compound(&mut self, nonhead: &Fragment, head: &Fragment) -> Result<Fragment> {
        let udef = self.basic("udef_q")?;
        let udef_nonhead = scopal(&udef, nonhead)?;

        let compound = self.build("compound", Properties::new(), role::ARG1)?;
        let with_nonhead = non_scopal_unshared(&compound, &udef_nonhead, role::ARG2)?;
        non_scopal_shared(&with_nonhead, head, role::ARG1)
    }

    /// "the man's key": `poss(possessed, possessor)`.
    pub fn possessive(&mut self, possessor: &Fragment, possessed: &Fragment) -> Result<Fragment> {
        let quant_possessor = self.quantify_if_needed(possessor)?;

        let poss = self.build("poss", Properties::new(), role::ARG1)?;
        let with_possessed = non_scopal_shared(&poss, possessed, role::ARG1)?;
        non_scopal_unshared(&with_possessed, &quant_possessor, role::ARG2)
    }

    /// "the cookie on the plate".
    pub fn preposition(
        &mut self,
        preposition: &Fragment,
        head: &Fragment,
        nonhead: &Fragment,
    ) -> Result<Fragment> {
        let quant_nonhead = self.quantify_if_needed(nonhead)?;

        let with_nonhead = non_scopal_unshared(preposition, &quant_nonhead, role::ARG2)?;
        non_scopal_shared(&with_nonhead, head, role::ARG1)
    }

    /// "a lake east of the mountains": the figure is located at a `place_n`
    /// that stands in `direction` to the ground.
    pub fn relative_direction(
        &mut self,
        direction: &Fragment,
        figure: &Fragment,
        ground: &Fragment,
    ) -> Result<Fragment> {
        let quant_ground = self.quantify_if_needed(ground)?;

        let place = self.basic("place_n")?;
        let with_ground = non_scopal_unshared(direction, &quant_ground, role::ARG2)?;
        let direction_place = non_scopal_shared(&with_ground, &place, role::ARG1)?;

        let def_implicit = self.basic("def_implicit_q")?;
        let quant_place = scopal(&def_implicit, &direction_place)?;

        let loc = self.build("loc_nonsp", Properties::new(), role::ARG1)?;
        let with_figure = non_scopal_shared(&loc, figure, role::ARG1)?;
        non_scopal_unshared(&with_figure, &quant_place, role::ARG2)
    }

    /// Verbal modifier of a noun.
    ///
    /// If the verb exposes an `ARG2`, the noun fills it ("the broken mirror").
    /// Otherwise the noun fills `ARG1` and the event is marked `PROG: bool`
    /// ("the glowing mirror").
    pub fn passive_participle(&mut self, verb: &Fragment, noun: &Fragment) -> Result<Fragment> {
        let candidates = verb.equivalents(verb.index);
        let position = verb
            .rels
            .iter()
            .rposition(|r| r.intrinsic().map(|v| candidates.contains(&v)).unwrap_or(false))
            .ok_or_else(|| {
                CompositionError::Structural(format!(
                    "No verbal predication is bound to index {}",
                    verb.index
                ))
            })?;
        let rel = &verb.rels[position];

        let mut participle = verb.clone();
        if let Some(patient) = rel.arg(role::ARG2) {
            participle.index = patient;
            non_scopal_shared(&participle, noun, role::ARG2)
        } else {
            let event = rel.intrinsic().ok_or_else(|| {
                CompositionError::Structural(format!("{} has no ARG0", rel.predicate))
            })?;
            let agent = rel.arg(role::ARG1).ok_or_else(|| {
                CompositionError::Structural(format!("{} has no ARG1", rel.predicate))
            })?;
            participle
                .variables
                .entry(event)
                .or_default()
                .insert("PROG".to_string(), "bool".to_string());
            participle.index = agent;
            non_scopal_shared(&participle, noun, role::ARG1)
        }
    }

    /// Adjectival or verbal descriptor ("red" vs "locked"), decided by
    /// whether the predication bound to the candidate's index is verbal.
    pub fn descriptor(&mut self, candidate: &Fragment, noun: &Fragment) -> Result<Fragment> {
        let candidates = candidate.equivalents(candidate.index);
        let verbal = candidate.rels.iter().any(|r| {
            r.intrinsic().map(|v| candidates.contains(&v)).unwrap_or(false)
                && patterns().verbal_prefix.is_match(&r.predicate)
        });
        if verbal {
            self.passive_participle(candidate, noun)
        } else {
            self.adjective(candidate, noun)
        }
    }

    /// Boolean property: the value fragment picks a branch, the branch is
    /// attached to the noun with the options' recipe.
    pub fn boolean(
        &mut self,
        options: &BooleanOptions,
        noun: &Fragment,
        value: &Fragment,
    ) -> Result<Fragment> {
        let chosen = match value.rels.first().map(|r| r.predicate.as_str()) {
            Some(TRUE_PREDICATE) => &options.when_true,
            Some(FALSE_PREDICATE) => &options.when_false,
            _ => {
                return Err(CompositionError::Structural(
                    "Boolean property edge doesn't point to boolean value".to_string(),
                ))
            }
        };
        self.apply(options.recipe, chosen, noun)
    }

    /// Derivational prefix ("un-" + "locked"). The result keeps the head's
    /// holes so it can still be composed as the head would be.
    pub fn prefix(&mut self, prefix: &Fragment, head: &Fragment) -> Result<Fragment> {
        let mut prefixed = non_scopal_shared(prefix, head, role::ARG1)?;
        prefixed.holes = head.holes.clone();
        Ok(prefixed)
    }
}
