//! SimpleMRS text encoding.
//!
//! ```text
//! [ TOP: h9
//!   INDEX: e7
//!   RELS: < [ unknown LBL: h8 ARG0: e7 ARG: x2 [ x NUM: sg ] ]
//!           [ _apple_n_1 LBL: h3 ARG0: x2 ] >
//!   HCONS: < h9 qeq h8 > ]
//! ```
//!
//! A variable's properties are written once, at its first mention.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::fragment::Fragment;
use crate::var::Var;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One predication per line.
    #[default]
    Indented,
    /// Everything on one line (what the generator is fed).
    Compact,
}

struct Writer<'f> {
    fragment: &'f Fragment,
    mentioned: BTreeSet<Var>,
}

impl<'f> Writer<'f> {
    fn var(&mut self, var: Var) -> String {
        let first = self.mentioned.insert(var);
        match self.fragment.properties(var) {
            Some(props) if first && !props.is_empty() => {
                let mut s = format!("{var} [ {}", var.sort);
                for (k, v) in props {
                    let _ = write!(s, " {k}: {v}");
                }
                s.push_str(" ]");
                s
            }
            _ => var.to_string(),
        }
    }
}

pub fn encode(fragment: &Fragment, layout: Layout) -> String {
    let mut w = Writer {
        fragment,
        mentioned: BTreeSet::new(),
    };

    let top = w.var(fragment.top.unwrap_or(fragment.ltop));
    let index = w.var(fragment.index);

    let rels: Vec<String> = fragment
        .rels
        .iter()
        .map(|rel| {
            let mut s = format!("[ {} LBL: {}", rel.predicate, w.var(rel.label));
            for (name, var) in &rel.args {
                let _ = write!(s, " {name}: {}", w.var(*var));
            }
            s.push_str(" ]");
            s
        })
        .collect();

    let hcons: Vec<String> = fragment
        .hcons
        .iter()
        .map(|hc| format!("{} qeq {}", w.var(hc.hi), w.var(hc.lo)))
        .collect();

    match layout {
        Layout::Compact => format!(
            "[ TOP: {top} INDEX: {index} RELS: < {} > HCONS: < {} > ]",
            rels.join(" "),
            hcons.join(" ")
        ),
        Layout::Indented => format!(
            "[ TOP: {top}\n  INDEX: {index}\n  RELS: < {} >\n  HCONS: < {} > ]",
            rels.join("\n          "),
            hcons.join(" ")
        ),
    }
}

/// Indented encoding.
pub fn to_simplemrs(fragment: &Fragment) -> String {
    encode(fragment, Layout::Indented)
}
