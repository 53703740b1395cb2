//! Semantic fragments: the values threaded through composition.
//!
//! A fragment is `<hook, holes, rels, eqs, hcons>` plus a property bag per
//! variable. The hook is the local top (`ltop`) and the `index`; `top` stays
//! unset until the fragment is finished by final-wrap.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::var::Var;

/// Role names with fixed meaning in the algebra.
pub mod role {
    /// Intrinsic variable of every predication.
    pub const ARG0: &str = "ARG0";
    pub const ARG1: &str = "ARG1";
    pub const ARG2: &str = "ARG2";
    /// The single role of the final wrapper predicate.
    pub const ARG: &str = "ARG";
    /// Quantifier restriction.
    pub const RSTR: &str = "RSTR";
    /// Quantifier body; never a hole.
    pub const BODY: &str = "BODY";
}

/// Grammatical features on a variable (`NUM: sg`, `PROG: bool`, ...).
pub type Properties = BTreeMap<String, String>;

/// One elementary predication: `[ pred LBL: h ARG0: x ... ]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predication {
    pub predicate: String,
    pub label: Var,
    /// Role bindings in signature order.
    pub args: Vec<(String, Var)>,
}

impl Predication {
    pub fn arg(&self, role: &str) -> Option<Var> {
        self.args
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, var)| *var)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.args.iter().any(|(name, _)| name == role)
    }

    pub fn intrinsic(&self) -> Option<Var> {
        self.arg(role::ARG0)
    }

    pub fn is_quantifier(&self) -> bool {
        self.has_role(role::RSTR)
    }
}

/// `hi qeq lo`: the predication labelled `hi` outscopes the one labelled `lo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleConstraint {
    pub hi: Var,
    pub lo: Var,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Global top; only set on a finished fragment.
    pub top: Option<Var>,
    pub ltop: Var,
    pub index: Var,
    pub rels: Vec<Predication>,
    pub variables: BTreeMap<Var, Properties>,
    /// Open argument positions: role -> variable.
    pub holes: BTreeMap<String, Var>,
    /// Deferred identities, resolved once at the end.
    pub eqs: Vec<(Var, Var)>,
    pub hcons: Vec<HandleConstraint>,
}

impl Fragment {
    pub fn is_finished(&self) -> bool {
        self.top.is_some()
    }

    pub fn hole(&self, role: &str) -> Option<Var> {
        self.holes.get(role).copied()
    }

    /// `var` plus every variable reachable from it through `eqs`.
    pub fn equivalents(&self, var: Var) -> BTreeSet<Var> {
        let mut set = BTreeSet::from([var]);
        let mut pending = vec![var];
        while let Some(current) = pending.pop() {
            for (a, b) in &self.eqs {
                let other = if *a == current {
                    *b
                } else if *b == current {
                    *a
                } else {
                    continue;
                };
                if set.insert(other) {
                    pending.push(other);
                }
            }
        }
        set
    }

    /// Position of the first predication whose intrinsic variable is the
    /// index (or equated to it).
    pub fn defining_predication(&self) -> Option<usize> {
        let candidates = self.equivalents(self.index);
        self.rels.iter().position(|r| {
            r.intrinsic()
                .map(|v| candidates.contains(&v))
                .unwrap_or(false)
        })
    }

    /// A fragment is quantified when some quantifier binds its index.
    pub fn is_quantified(&self) -> bool {
        let candidates = self.equivalents(self.index);
        self.rels.iter().any(|r| {
            r.is_quantifier()
                && r.intrinsic()
                    .map(|v| candidates.contains(&v))
                    .unwrap_or(false)
        })
    }

    pub fn properties(&self, var: Var) -> Option<&Properties> {
        self.variables.get(&var)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.rels.iter().map(|r| r.predicate.as_str())
    }
}
