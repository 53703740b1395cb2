use std::path::PathBuf;

use graphmrs_algebra::{
    encode, resolve, role, Composer, Fragment, Layout, PredicateKind, Properties, SynopsisTable,
};
use proptest::prelude::*;

const ADJECTIVES: [&str; 4] = ["_red_a_1", "_green_a_1", "_wooden_a_1", "_open_a_1"];
const NOUNS: [&str; 4] = ["_apple_n_1", "_table_n_1", "_door_n_1", "_plate_n_1"];

fn synopses() -> SynopsisTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/synopses.json");
    SynopsisTable::from_json_file(&path).expect("load synopses")
}

fn noun(composer: &mut Composer<'_>, predicate: &str) -> Fragment {
    let properties = Properties::from([("NUM".to_string(), "sg".to_string())]);
    composer
        .build_kind(PredicateKind::Noun, predicate, properties)
        .expect("noun")
}

fn stack(composer: &mut Composer<'_>, head: &str, adjectives: &[usize]) -> Fragment {
    let mut fragment = noun(composer, head);
    for &i in adjectives {
        let adjective = composer
            .build_kind(PredicateKind::Adjective, ADJECTIVES[i], Properties::new())
            .expect("adjective");
        fragment = composer.adjective(&adjective, &fragment).expect("compose");
    }
    fragment
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stacked_adjectives_share_the_noun_label(
        head in 0usize..NOUNS.len(),
        adjectives in proptest::collection::vec(0usize..ADJECTIVES.len(), 0..6),
    ) {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let composed = stack(&mut composer, NOUNS[head], &adjectives);
        let finished = composer.finish(&composed).expect("finish");

        // adjectives + noun + default quantifier + wrapper
        prop_assert_eq!(finished.rels.len(), adjectives.len() + 3);
        prop_assert_eq!(finished.hcons.len(), 2);
        prop_assert!(finished.eqs.is_empty());

        let noun = finished
            .rels
            .iter()
            .find(|r| r.predicate == NOUNS[head])
            .expect("noun rel");
        for rel in finished.rels.iter().filter(|r| ADJECTIVES.contains(&r.predicate.as_str())) {
            prop_assert_eq!(rel.label, noun.label);
            prop_assert_eq!(rel.arg(role::ARG1), noun.intrinsic());
        }
    }

    #[test]
    fn resolution_is_stable_on_composed_fragments(
        head in 0usize..NOUNS.len(),
        adjectives in proptest::collection::vec(0usize..ADJECTIVES.len(), 0..6),
    ) {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let composed = stack(&mut composer, NOUNS[head], &adjectives);
        let once = resolve(&composed);
        prop_assert_eq!(resolve(&once), once.clone());
        prop_assert_eq!(once.rels.len(), composed.rels.len());
    }

    #[test]
    fn properties_are_printed_once(
        head in 0usize..NOUNS.len(),
        adjectives in proptest::collection::vec(0usize..ADJECTIVES.len(), 0..6),
    ) {
        let table = synopses();
        let mut composer = Composer::new(&table);
        let composed = stack(&mut composer, NOUNS[head], &adjectives);
        let finished = composer.finish(&composed).expect("finish");

        let text = encode(&finished, Layout::Compact);
        prop_assert_eq!(text.matches("NUM: sg").count(), 1);
    }
}
