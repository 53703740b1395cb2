//! Composition algebra for Minimal Recursion Semantics fragments.
//!
//! The crate is layered leaves-first:
//!
//! - [`var`]: variables and the per-run labeler
//! - [`synopsis`]: predicate signatures
//! - [`fragment`]: the fragment value type
//! - [`composer`]: the per-run context and base-fragment builder
//! - [`ops`]: the four primitive operators
//! - [`library`]: named recipes built from the operators
//! - [`resolve`] and [`finish`]: canonicalization of a complete expression
//! - [`simplemrs`]: text encoding for the generator
//!
//! Fragments are values: every operator returns a new fragment and leaves its
//! inputs untouched, so a caller can keep a fragment around after a failed
//! composition.

pub mod composer;
pub mod error;
pub mod finish;
pub mod fragment;
pub mod library;
pub mod ops;
pub mod resolve;
pub mod simplemrs;
pub mod synopsis;
pub mod var;

#[cfg(test)]
mod test_support;

pub use composer::{Composer, DEFAULT_QUANTIFIER, DEFAULT_WRAPPER};
pub use error::{CompositionError, ErrorKind, Result};
pub use fragment::{role, Fragment, HandleConstraint, Predication, Properties};
pub use library::{BooleanOptions, EdgeOperand, PredicateKind, Recipe, VerbalBranch};
pub use resolve::resolve;
pub use simplemrs::{encode, to_simplemrs, Layout};
pub use synopsis::{RoleSpec, SynopsisLookup, SynopsisTable};
pub use var::{Labeler, Var, VarSort};
