//! Variables and the per-run variable labeler.
//!
//! A variable is a sort tag plus a numeric id, written `"{sort}{id}"` (`x4`,
//! `h12`). All sorts draw from one shared counter, so two variables minted by
//! the same [`Labeler`] never collide even when their sorts differ.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CompositionError;

/// Variable sort, ordered the way the grammar's type hierarchy orders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VarSort {
    /// Handle (scope position).
    #[serde(rename = "h")]
    Handle,
    /// Event.
    #[serde(rename = "e")]
    Event,
    /// Instance.
    #[serde(rename = "x")]
    Instance,
    /// Individual (event or instance).
    #[serde(rename = "i")]
    Individual,
    /// Non-handle (individual or handle-free).
    #[serde(rename = "p")]
    NonHandle,
    /// Underspecified.
    #[serde(rename = "u")]
    Unspecified,
}

impl VarSort {
    pub fn tag(self) -> char {
        match self {
            VarSort::Handle => 'h',
            VarSort::Event => 'e',
            VarSort::Instance => 'x',
            VarSort::Individual => 'i',
            VarSort::NonHandle => 'p',
            VarSort::Unspecified => 'u',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'h' => Some(VarSort::Handle),
            'e' => Some(VarSort::Event),
            'x' => Some(VarSort::Instance),
            'i' => Some(VarSort::Individual),
            'p' => Some(VarSort::NonHandle),
            'u' => Some(VarSort::Unspecified),
            _ => None,
        }
    }

    /// Rank used to pick the representative of an equality group.
    ///
    /// `u` < {`i`, `p`} < {`e`, `x`, `h`}
    pub fn specificity(self) -> u8 {
        match self {
            VarSort::Unspecified => 0,
            VarSort::Individual | VarSort::NonHandle => 1,
            VarSort::Event | VarSort::Instance | VarSort::Handle => 2,
        }
    }
}

impl fmt::Display for VarSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Var {
    pub sort: VarSort,
    pub id: u32,
}

impl Var {
    pub const fn new(sort: VarSort, id: u32) -> Self {
        Self { sort, id }
    }

    pub fn is_handle(self) -> bool {
        self.sort == VarSort::Handle
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sort.tag(), self.id)
    }
}

impl FromStr for Var {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let sort = chars
            .next()
            .and_then(VarSort::from_tag)
            .ok_or_else(|| CompositionError::Data(format!("invalid variable sort in `{s}`")))?;
        let id = chars
            .as_str()
            .parse::<u32>()
            .map_err(|_| CompositionError::Data(format!("invalid variable id in `{s}`")))?;
        Ok(Var { sort, id })
    }
}

impl TryFrom<String> for Var {
    type Error = CompositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Var> for String {
    fn from(value: Var) -> Self {
        value.to_string()
    }
}

/// Issues fresh variables from a single counter.
///
/// A labeler belongs to one generation run; create a new one (or call
/// [`Labeler::reset`]) before composing an unrelated representation.
#[derive(Debug, Clone, Default)]
pub struct Labeler {
    next: u32,
}

impl Labeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, sort: VarSort) -> Var {
        let var = Var::new(sort, self.next);
        self.next += 1;
        var
    }

    /// Number of variables issued so far.
    pub fn issued(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
