//! Abstract execution-backend interface.
//!
//! The graph and data modules never touch a concrete device; anything that
//! can populate parameters and evaluate a graph implements [`Backend`].

use crate::graph::graph::{Graph, NodeId};
use crate::math::matrix::Matrix;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Learnable tensors keyed by parameter name. A `BTreeMap` keeps iteration
/// (and serialization) order deterministic.
pub type Parameters = BTreeMap<String, Matrix>;

/// Runtime inputs: one feature vector per input placeholder name.
pub type Feeds = HashMap<String, Vec<f32>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("no feed supplied for input '{0}'")]
    MissingInput(String),
    #[error("no value found for parameter '{0}'")]
    MissingParameter(String),
    #[error("feed '{name}' has width {found}, the input expects {expected}")]
    FeedWidthMismatch { name: String, expected: usize, found: usize },
    #[error("node {0} does not exist in the executed graph")]
    NodeNotFound(NodeId),
}

/// An execution capability bound to some compute device.
pub trait Backend {
    /// One-shot initialization pass: populates every learnable parameter of
    /// the graph with its default initializer.
    fn initialize(&mut self, graph: &Graph) -> Result<Parameters, RuntimeError>;

    /// Evaluates the graph for a single example, returning the value of the
    /// designated output node.
    fn run(&self, graph: &Graph, params: &Parameters, feeds: &Feeds) -> Result<Vec<f32>, RuntimeError>;
}
