//! Scene graph to MRS conversion.
//!
//! Ties the composition algebra to graph data:
//! - [`lexicon`]: graph vocabulary to predicates and recipes
//! - [`table`]: how each recipe relates to parent, child and edge
//! - [`graph`]: the JSON scene-graph input
//! - [`convert`]: the recursive traversal
//! - [`evaluation`]: per-node/edge records and coverage reports

pub mod convert;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod lexicon;
pub mod regularize;
pub mod table;

#[cfg(test)]
mod test_support;

pub use convert::{convert_and_finish, convert_graph, Conversion};
pub use error::{ConvertError, Result};
pub use evaluation::{EvalInfo, GenerationInfo, Record, Summary};
pub use graph::{GraphEdge, SceneGraph};
pub use lexicon::Lexicon;
pub use table::CompositionTable;
