use graphmrs_algebra::SynopsisTable;

pub(crate) fn synopses() -> SynopsisTable {
    SynopsisTable::from_json_str(include_str!("../../../fixtures/synopses.json"))
        .expect("fixture synopsis table")
}
