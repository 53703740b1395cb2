//! Turning a composed fragment into a complete representation.

use crate::composer::Composer;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::ops::final_wrap;
use crate::resolve::resolve;
use crate::var::VarSort;

impl<'a> Composer<'a> {
    /// Quantify the expression if nothing binds its index yet, wrap it in the
    /// root predicate under a fresh global top, and resolve equalities.
    pub fn finish(&mut self, fragment: &Fragment) -> Result<Fragment> {
        let quantified = self.quantify_if_needed(fragment)?;
        let predicate = self.wrapper().to_string();
        let wrapper = self.basic(&predicate)?;
        let top = self.fresh(VarSort::Handle);
        let wrapped = final_wrap(&wrapper, &quantified, top)?;
        Ok(resolve(&wrapped))
    }

    /// [`Composer::finish`] for the converter's optional output.
    pub fn finish_opt(&mut self, fragment: Option<&Fragment>) -> Result<Option<Fragment>> {
        fragment.map(|f| self.finish(f)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::composer::Composer;
    use crate::fragment::{HandleConstraint, Properties};
    use crate::library::PredicateKind;
    use crate::test_support::synopses;

    #[test]
    fn bare_noun_gets_default_quantifier_and_wrapper() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let apple = c.basic("_apple_n_1").unwrap();
        let out = c.finish(&apple).unwrap();

        let preds: Vec<_> = out.predicates().collect();
        assert_eq!(preds, vec!["unknown", "def_udef_a_q", "_apple_n_1"]);
        assert!(out.is_finished());
        assert!(out.eqs.is_empty());

        // unknown(ARG) and the quantifier both bind the apple instance.
        let apple_var = out.rels[2].intrinsic().unwrap();
        assert_eq!(out.rels[0].arg("ARG"), Some(apple_var));
        assert_eq!(out.rels[1].intrinsic(), Some(apple_var));

        let top = out.top.unwrap();
        assert!(out.hcons.contains(&HandleConstraint { hi: top, lo: out.rels[0].label }));
        assert!(out.hcons.contains(&HandleConstraint {
            hi: out.rels[1].arg("RSTR").unwrap(),
            lo: out.rels[2].label
        }));
    }

    #[test]
    fn already_quantified_expression_is_not_requantified() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let the = c.basic("_the_q").unwrap();
        let apple = c.basic("_apple_n_1").unwrap();
        let the_apple = c.quantify(&the, &apple).unwrap();
        let out = c.finish(&the_apple).unwrap();
        assert_eq!(out.rels.iter().filter(|r| r.is_quantifier()).count(), 1);
    }

    #[test]
    fn quantified_noun_keeps_one_quantifier_under_stacked_adjectives() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let the = c.basic("_the_q").unwrap();
        let apple = c.basic("_apple_n_1").unwrap();
        let mut np = c.quantify(&the, &apple).unwrap();
        for predicate in ["_red_a_1", "_green_a_1"] {
            let adjective = c
                .build_kind(PredicateKind::Adjective, predicate, Properties::new())
                .unwrap();
            np = c.adjective(&adjective, &np).unwrap();
        }
        assert!(np.is_quantified());

        let out = c.finish(&np).unwrap();
        let quantifiers: Vec<_> = out.rels.iter().filter(|r| r.is_quantifier()).collect();
        assert_eq!(quantifiers.len(), 1);
        assert_eq!(quantifiers[0].predicate, "_the_q");
    }

    #[test]
    fn adjective_and_noun_share_a_label_after_finishing() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let red = c
            .build_kind(PredicateKind::Adjective, "_red_a_1", Properties::new())
            .unwrap();
        let apple = c.basic("_apple_n_1").unwrap();
        let red_apple = c.adjective(&red, &apple).unwrap();
        let out = c.finish(&red_apple).unwrap();

        let red_rel = out.rels.iter().find(|r| r.predicate == "_red_a_1").unwrap();
        let apple_rel = out.rels.iter().find(|r| r.predicate == "_apple_n_1").unwrap();
        assert_eq!(red_rel.label, apple_rel.label);
        assert_eq!(red_rel.arg("ARG1"), apple_rel.intrinsic());
    }

    #[test]
    fn missing_fragment_finishes_to_nothing() {
        let table = synopses();
        let mut c = Composer::new(&table);
        assert!(c.finish_opt(None).unwrap().is_none());
    }
}
