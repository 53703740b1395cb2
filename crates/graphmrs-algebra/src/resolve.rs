//! Equality resolution.
//!
//! Composition only records identities; nothing is substituted until the very
//! end. Resolution partitions variables into equality groups, picks one
//! representative per group and rewrites the whole fragment in terms of the
//! representatives.

use std::collections::BTreeMap;

use crate::fragment::{Fragment, HandleConstraint, Predication, Properties};
use crate::var::Var;

/// Disjoint-set forest over the variables mentioned in equality pairs.
#[derive(Debug, Default)]
struct Groups {
    parent: BTreeMap<Var, Var>,
    /// Order in which each variable was first seen; breaks specificity ties.
    seen: BTreeMap<Var, usize>,
}

impl Groups {
    fn add(&mut self, var: Var) {
        if !self.parent.contains_key(&var) {
            let order = self.seen.len();
            self.seen.insert(var, order);
            self.parent.insert(var, var);
        }
    }

    fn find(&mut self, var: Var) -> Var {
        let mut root = var;
        while let Some(&p) = self.parent.get(&root) {
            if p == root {
                break;
            }
            root = p;
        }
        // Path compression.
        let mut cur = var;
        while cur != root {
            let next = self.parent.get(&cur).copied().unwrap_or(root);
            self.parent.insert(cur, root);
            cur = next;
        }
        root
    }

    fn union(&mut self, a: Var, b: Var) {
        self.add(a);
        self.add(b);
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        // Keep the better representative as root.
        if self.better(rb, ra) {
            self.parent.insert(ra, rb);
        } else {
            self.parent.insert(rb, ra);
        }
    }

    /// More specific sort wins; among equals the earlier-seen variable wins.
    fn better(&self, a: Var, b: Var) -> bool {
        let sa = a.sort.specificity();
        let sb = b.sort.specificity();
        if sa != sb {
            return sa > sb;
        }
        self.seen.get(&a) < self.seen.get(&b)
    }

    fn representatives(mut self) -> BTreeMap<Var, Var> {
        let vars: Vec<Var> = self.parent.keys().copied().collect();
        vars.into_iter()
            .map(|v| {
                let rep = self.find(v);
                (v, rep)
            })
            .filter(|(v, rep)| v != rep)
            .collect()
    }
}

/// Map each variable to its group representative.
pub fn representatives(eqs: &[(Var, Var)]) -> BTreeMap<Var, Var> {
    let mut groups = Groups::default();
    for &(a, b) in eqs {
        groups.union(a, b);
    }
    groups.representatives()
}

/// Rewrite `fragment` so that every equality group is a single variable and
/// clear the equality list. Running it twice changes nothing.
pub fn resolve(fragment: &Fragment) -> Fragment {
    let reps = representatives(&fragment.eqs);
    let sub = |v: Var| reps.get(&v).copied().unwrap_or(v);

    let rels = fragment
        .rels
        .iter()
        .map(|rel| Predication {
            predicate: rel.predicate.clone(),
            label: sub(rel.label),
            args: rel
                .args
                .iter()
                .map(|(name, var)| (name.clone(), sub(*var)))
                .collect(),
        })
        .collect();

    let mut variables: BTreeMap<Var, Properties> = BTreeMap::new();
    for (var, props) in &fragment.variables {
        let bag = variables.entry(sub(*var)).or_default();
        for (k, v) in props {
            bag.insert(k.clone(), v.clone());
        }
    }

    let hcons = fragment
        .hcons
        .iter()
        .map(|hc| HandleConstraint {
            hi: sub(hc.hi),
            lo: sub(hc.lo),
        })
        .collect();

    let holes = fragment
        .holes
        .iter()
        .map(|(name, var)| (name.clone(), sub(*var)))
        .collect();

    Fragment {
        top: fragment.top.map(sub),
        ltop: sub(fragment.ltop),
        index: sub(fragment.index),
        rels,
        variables,
        holes,
        eqs: Vec::new(),
        hcons,
    }
}
