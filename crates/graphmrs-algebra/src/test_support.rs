use crate::synopsis::SynopsisTable;

pub(crate) fn synopses() -> SynopsisTable {
    SynopsisTable::from_json_str(include_str!("../../../fixtures/synopses.json"))
        .expect("fixture synopsis table")
}
