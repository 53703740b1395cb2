//! The four primitive composition operators.
//!
//! Every operator plugs one hole of the functor with the argument:
//!
//! ```text
//! hook  = FUNC.hook
//! holes = FUNC.holes - HOLE
//! rels  = FUNC.rels ++ ARG.rels
//! eqs   = FUNC.eqs ++ ARG.eqs ++ (ARG.index, FUNC.holes[HOLE]) ++ extra
//! hcons = FUNC.hcons ++ ARG.hcons ++ extra
//! ```
//!
//! The argument's own remaining holes are dropped. Recipes that need them back
//! (see `prefix`) restore them explicitly.

use crate::error::{CompositionError, Result};
use crate::fragment::{role, Fragment, HandleConstraint};
use crate::var::Var;

fn plug(functor: &Fragment, argument: &Fragment, hole: &str) -> Result<Fragment> {
    let hole_var = functor
        .hole(hole)
        .ok_or_else(|| CompositionError::missing_hole(hole))?;

    let holes = functor
        .holes
        .iter()
        .filter(|(name, _)| name.as_str() != hole)
        .map(|(name, var)| (name.clone(), *var))
        .collect();

    let mut rels = functor.rels.clone();
    rels.extend(argument.rels.iter().cloned());

    let mut variables = functor.variables.clone();
    for (var, props) in &argument.variables {
        variables.insert(*var, props.clone());
    }

    let mut eqs = functor.eqs.clone();
    eqs.extend(argument.eqs.iter().copied());
    eqs.push((argument.index, hole_var));

    let mut hcons = functor.hcons.clone();
    hcons.extend(argument.hcons.iter().copied());

    Ok(Fragment {
        top: None,
        ltop: functor.ltop,
        index: functor.index,
        rels,
        variables,
        holes,
        eqs,
        hcons,
    })
}

/// Intersective composition that identifies the two labels (adjective + noun).
pub fn non_scopal_shared(functor: &Fragment, argument: &Fragment, hole: &str) -> Result<Fragment> {
    let mut out = plug(functor, argument, hole)?;
    out.eqs.push((functor.ltop, argument.ltop));
    Ok(out)
}

/// Intersective composition that keeps the labels apart (relator + complement).
pub fn non_scopal_unshared(
    functor: &Fragment,
    argument: &Fragment,
    hole: &str,
) -> Result<Fragment> {
    plug(functor, argument, hole)
}

/// Quantifier over its restriction: plugs the quantifier's `ARG0` with the
/// argument's index and adds `RSTR qeq ARG.ltop`.
pub fn scopal(quantifier: &Fragment, argument: &Fragment) -> Result<Fragment> {
    let rstr = quantifier
        .hole(role::RSTR)
        .ok_or_else(|| CompositionError::missing_hole(role::RSTR))?;
    let mut out = plug(quantifier, argument, role::ARG0)?;
    out.hcons.push(HandleConstraint {
        hi: rstr,
        lo: argument.ltop,
    });
    Ok(out)
}

/// Wrap a complete expression in the generator's root predicate.
///
/// Plugs the wrapper's `ARG` with the argument's index, sets `top` as the new
/// global top, and adds `top qeq wrapper.ltop`.
pub fn final_wrap(wrapper: &Fragment, argument: &Fragment, top: Var) -> Result<Fragment> {
    let mut out = plug(wrapper, argument, role::ARG)?;
    out.top = Some(top);
    out.hcons.push(HandleConstraint {
        hi: top,
        lo: wrapper.ltop,
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::fragment::Properties;
    use crate::test_support::synopses;
    use crate::var::VarSort;

    #[test]
    fn shared_and_unshared_differ_only_by_label_equality() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let red = c.build("_red_a_1", Properties::new(), role::ARG1).unwrap();
        let apple = c.basic("_apple_n_1").unwrap();

        let shared = non_scopal_shared(&red, &apple, "ARG1").unwrap();
        let unshared = non_scopal_unshared(&red, &apple, "ARG1").unwrap();

        assert_eq!(shared.rels, unshared.rels);
        assert_eq!(shared.holes, unshared.holes);
        assert!(!shared.holes.contains_key("ARG1"));
        assert_eq!(shared.eqs.len(), unshared.eqs.len() + 1);
        assert_eq!(&shared.eqs[..unshared.eqs.len()], unshared.eqs.as_slice());
        assert_eq!(shared.eqs.last(), Some(&(red.ltop, apple.ltop)));
        assert_eq!(unshared.eqs, vec![(apple.index, red.hole("ARG1").unwrap())]);
    }

    #[test]
    fn absent_hole_fails_for_both_non_scopal_operators() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let red = c.build("_red_a_1", Properties::new(), role::ARG1).unwrap();
        let apple = c.basic("_apple_n_1").unwrap();

        for result in [
            non_scopal_shared(&red, &apple, "ARG2"),
            non_scopal_unshared(&red, &apple, "ARG2"),
        ] {
            let err = result.expect_err("absent hole");
            assert!(matches!(err, CompositionError::Structural(_)));
            assert_eq!(err.to_string(), "Semantic functor has no ARG2 hole");
        }
    }

    #[test]
    fn result_keeps_functor_hook_and_drops_argument_holes() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let on = c.build("_on_p_loc", Properties::new(), role::ARG1).unwrap();
        let lock = c.basic("_lock_v_1").unwrap();

        let out = non_scopal_unshared(&on, &lock, "ARG2").unwrap();
        assert_eq!(out.ltop, on.ltop);
        assert_eq!(out.index, on.index);
        assert_eq!(out.holes.keys().collect::<Vec<_>>(), vec!["ARG1"]);
    }

    #[test]
    fn argument_properties_win_on_collision() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let red = c.build("_red_a_1", Properties::new(), role::ARG1).unwrap();
        let mut apple = c.basic("_apple_n_1").unwrap();
        let mut functor = red.clone();
        let shared_key = apple.index;
        functor
            .variables
            .insert(shared_key, Properties::from([("NUM".to_string(), "pl".to_string())]));
        apple
            .variables
            .insert(shared_key, Properties::from([("NUM".to_string(), "sg".to_string())]));

        let out = non_scopal_shared(&functor, &apple, "ARG1").unwrap();
        assert_eq!(out.variables[&shared_key]["NUM"], "sg");
    }

    #[test]
    fn scopal_adds_one_qeq_and_one_equality() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let the = c.basic("_the_q").unwrap();
        let apple = c.basic("_apple_n_1").unwrap();

        let out = scopal(&the, &apple).unwrap();
        assert_eq!(out.rels.len(), the.rels.len() + apple.rels.len());
        assert_eq!(
            out.hcons,
            vec![HandleConstraint {
                hi: the.hole("RSTR").unwrap(),
                lo: apple.ltop
            }]
        );
        assert_eq!(out.eqs, vec![(apple.index, the.hole("ARG0").unwrap())]);
        assert!(!out.holes.contains_key("ARG0"));
        assert!(out.holes.contains_key("RSTR"));
        assert_eq!(out.index, the.index);
    }

    #[test]
    fn scopal_requires_a_quantifier() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let apple = c.basic("_apple_n_1").unwrap();
        let other = c.basic("_apple_n_1").unwrap();
        assert!(matches!(
            scopal(&apple, &other),
            Err(CompositionError::Structural(_))
        ));
    }

    #[test]
    fn final_wrap_sets_the_global_top() {
        let table = synopses();
        let mut c = Composer::new(&table);
        let unknown = c.basic("unknown").unwrap();
        let apple = c.basic("_apple_n_1").unwrap();
        let top = c.fresh(VarSort::Handle);

        let out = final_wrap(&unknown, &apple, top).unwrap();
        assert_eq!(out.top, Some(top));
        assert!(out.is_finished());
        assert_eq!(out.hcons.last(), Some(&HandleConstraint { hi: top, lo: unknown.ltop }));
        assert_eq!(out.eqs, vec![(apple.index, unknown.hole("ARG").unwrap())]);
        assert_eq!(out.index, unknown.index);
    }
}
