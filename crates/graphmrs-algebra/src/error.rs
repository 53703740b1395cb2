use thiserror::Error;

/// Failure raised while building or composing fragments.
///
/// The message is what ends up as the "reason" column of an evaluation
/// report, so keep it readable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// Unknown predicate, lexicon key, recipe, or classification.
    #[error("{0}")]
    Lookup(String),
    /// A structural precondition failed (absent hole, non-boolean value, ...).
    #[error("{0}")]
    Structural(String),
    /// Data is present but unusable (e.g. an empty lexicon entry).
    #[error("{0}")]
    Data(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lookup,
    Structural,
    Data,
}

impl CompositionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompositionError::Lookup(_) => ErrorKind::Lookup,
            CompositionError::Structural(_) => ErrorKind::Structural,
            CompositionError::Data(_) => ErrorKind::Data,
        }
    }

    pub(crate) fn missing_hole(role: &str) -> Self {
        CompositionError::Structural(format!("Semantic functor has no {role} hole"))
    }
}

pub type Result<T> = std::result::Result<T, CompositionError>;
