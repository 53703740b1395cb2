//! Per-run composition context and the base-fragment builder.

use std::collections::BTreeMap;

use crate::error::{CompositionError, Result};
use crate::fragment::{role, Fragment, Predication, Properties};
use crate::synopsis::SynopsisLookup;
use crate::var::{Labeler, Var, VarSort};

/// Quantifier used when a recipe or the finishing step has to quantify a bare
/// nominal fragment.
pub const DEFAULT_QUANTIFIER: &str = "def_udef_a_q";

/// Predicate wrapped around a finished referring expression.
pub const DEFAULT_WRAPPER: &str = "unknown";

/// Owns everything one generation run needs to mint fragments: the variable
/// labeler and the signature lookup.
///
/// Build one `Composer` per independent representation (or call
/// [`Composer::reset`]) so variable names never leak across runs.
pub struct Composer<'a> {
    labeler: Labeler,
    synopses: &'a dyn SynopsisLookup,
    default_quantifier: String,
    wrapper: String,
}

impl<'a> Composer<'a> {
    pub fn new(synopses: &'a dyn SynopsisLookup) -> Self {
        Self {
            labeler: Labeler::new(),
            synopses,
            default_quantifier: DEFAULT_QUANTIFIER.to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
        }
    }

    pub fn with_default_quantifier(mut self, predicate: impl Into<String>) -> Self {
        self.default_quantifier = predicate.into();
        self
    }

    pub fn with_wrapper(mut self, predicate: impl Into<String>) -> Self {
        self.wrapper = predicate.into();
        self
    }

    pub fn default_quantifier(&self) -> &str {
        &self.default_quantifier
    }

    pub fn wrapper(&self) -> &str {
        &self.wrapper
    }

    pub fn synopses(&self) -> &'a dyn SynopsisLookup {
        self.synopses
    }

    pub fn fresh(&mut self, sort: VarSort) -> Var {
        self.labeler.next(sort)
    }

    pub fn labeler(&self) -> &Labeler {
        &self.labeler
    }

    pub fn reset(&mut self) {
        self.labeler.reset();
    }

    /// Build a one-predication fragment for `predicate`.
    ///
    /// Every role gets a fresh variable; the predication's label is a fresh
    /// handle. `index_role` picks which role's variable becomes the index and
    /// carries `properties`.
    ///
    /// Holes are every role except the intrinsic `ARG0`, unless the predicate
    /// is a quantifier, in which case they are every role except `BODY` (so the
    /// quantifier's `ARG0` is both index and hole until scopal composition
    /// consumes it).
    pub fn build(
        &mut self,
        predicate: &str,
        properties: Properties,
        index_role: &str,
    ) -> Result<Fragment> {
        let synopses = self.synopses;
        let roles = synopses.find(predicate)?;

        let args: Vec<(String, Var)> = roles
            .iter()
            .map(|spec| (spec.name.clone(), self.labeler.next(spec.sort)))
            .collect();
        let label = self.labeler.next(VarSort::Handle);
        let rel = Predication {
            predicate: predicate.to_string(),
            label,
            args,
        };

        let index = rel.arg(index_role).ok_or_else(|| {
            CompositionError::Structural(format!(
                "{predicate} has no {index_role} role to serve as index"
            ))
        })?;

        let holes = base_holes(&rel);

        let mut variables = BTreeMap::new();
        variables.insert(index, properties);

        Ok(Fragment {
            top: None,
            ltop: label,
            index,
            rels: vec![rel],
            variables,
            holes,
            eqs: Vec::new(),
            hcons: Vec::new(),
        })
    }

    /// [`Composer::build`] with no properties and `ARG0` as index.
    pub fn basic(&mut self, predicate: &str) -> Result<Fragment> {
        self.build(predicate, Properties::new(), role::ARG0)
    }
}

fn base_holes(rel: &Predication) -> BTreeMap<String, Var> {
    if rel.is_quantifier() {
        rel.args
            .iter()
            .filter(|(name, _)| name != role::BODY)
            .cloned()
            .collect()
    } else {
        let intrinsic = rel.intrinsic();
        rel.args
            .iter()
            .filter(|(_, var)| Some(*var) != intrinsic)
            .cloned()
            .collect()
    }
}
