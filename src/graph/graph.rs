//! Immutable computation graphs for slot-based scorers.
//!
//! A [`Graph`] is a directed acyclic graph stored as an arena: nodes only
//! ever reference earlier nodes, so iterating in id order is a topological
//! walk. Graphs are produced by [`GraphBuilder`](crate::graph::builder::GraphBuilder)
//! and never mutated afterwards.

use crate::activation::activation::ActivationFunction;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Index of a node inside its graph.
pub type NodeId = usize;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    NodeNotFound(NodeId),
    #[error("sum node needs at least one input")]
    EmptySum,
    #[error("width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },
    #[error("dense layer size must be at least 1")]
    ZeroSizeDense,
}

/// The operation a node performs. Operand ids always point at earlier nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Runtime-fed placeholder, one per feature slot.
    Input { name: String },
    /// Element-wise sum over any number of same-width operands.
    Sum { inputs: Vec<NodeId> },
    /// Normalization by accumulated batch statistics (mean/stddev per lane).
    DataNorm { input: NodeId },
    /// Fully connected transform `xW + b` followed by an activation.
    Dense { input: NodeId, size: usize, activation: ActivationFunction },
    /// Final squashing nonlinearity.
    Sigmoid { input: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Variable name: slot name for inputs, `fc_0`-style for layers.
    pub name: String,
    pub kind: NodeKind,
    /// Output vector width of this node.
    pub width: usize,
}

/// How a learnable tensor is populated during the initialization pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InitKind {
    /// N(0, sqrt(2 / fan_in)) — weights feeding ReLU.
    He,
    /// N(0, sqrt(1 / fan_in)) — weights feeding Sigmoid/Identity.
    Xavier,
    Zeros,
    /// Every entry set to a constant (data-norm statistics).
    Filled(f32),
}

/// Name, shape, and default initializer of one learnable tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub init: InitKind,
}

/// Statistics start as size = square_sum = 1e4 and sum = 0, so the initial
/// normalization is the identity transform (mean 0, stddev 1).
pub const DATA_NORM_INITIAL_STAT: f32 = 1e4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    inputs: Vec<NodeId>,
    output: NodeId,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, inputs: Vec<NodeId>, output: NodeId) -> Graph {
        Graph { nodes, inputs, output }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Ids of input placeholders in declaration order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Input placeholder names in declaration order. These are the feed
    /// names a runtime consumer must supply.
    pub fn input_names(&self) -> Vec<String> {
        self.inputs
            .iter()
            .map(|&id| self.nodes[id].name.clone())
            .collect()
    }

    /// The designated output node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Name, shape, and initializer of every learnable tensor, in node order.
    ///
    /// Dense layers own `<name>.w_0` / `<name>.b_0`; data-norm layers own
    /// the three accumulated statistics tensors.
    pub fn parameters(&self) -> Vec<ParameterSpec> {
        let mut specs = Vec::new();
        for node in &self.nodes {
            match &node.kind {
                NodeKind::Dense { input, size, activation } => {
                    let fan_in = self.nodes[*input].width;
                    let weight_init = match activation {
                        ActivationFunction::ReLU => InitKind::He,
                        _ => InitKind::Xavier,
                    };
                    specs.push(ParameterSpec {
                        name: format!("{}.w_0", node.name),
                        rows: fan_in,
                        cols: *size,
                        init: weight_init,
                    });
                    specs.push(ParameterSpec {
                        name: format!("{}.b_0", node.name),
                        rows: 1,
                        cols: *size,
                        init: InitKind::Zeros,
                    });
                }
                NodeKind::DataNorm { .. } => {
                    for (stat, init) in [
                        ("batch_size", InitKind::Filled(DATA_NORM_INITIAL_STAT)),
                        ("batch_sum", InitKind::Zeros),
                        ("batch_square_sum", InitKind::Filled(DATA_NORM_INITIAL_STAT)),
                    ] {
                        specs.push(ParameterSpec {
                            name: format!("{}.{}", node.name, stat),
                            rows: 1,
                            cols: node.width,
                            init,
                        });
                    }
                }
                NodeKind::Input { .. } | NodeKind::Sum { .. } | NodeKind::Sigmoid { .. } => {}
            }
        }
        specs
    }

    /// A pruned clone retaining only nodes reachable from the output.
    ///
    /// This is the inference variant of the graph: anything not needed to
    /// compute the output from the inputs (dead branches, training-only
    /// bookkeeping) is dropped and ids are re-numbered compactly.
    pub fn inference_clone(&self) -> Graph {
        let mut reachable = vec![false; self.nodes.len()];
        let mut stack = vec![self.output];
        while let Some(id) = stack.pop() {
            if reachable[id] {
                continue;
            }
            reachable[id] = true;
            match &self.nodes[id].kind {
                NodeKind::Input { .. } => {}
                NodeKind::Sum { inputs } => stack.extend(inputs.iter().copied()),
                NodeKind::DataNorm { input }
                | NodeKind::Dense { input, .. }
                | NodeKind::Sigmoid { input } => stack.push(*input),
            }
        }

        // Ascending old-id order keeps the arena topologically sorted.
        let mut remap = vec![usize::MAX; self.nodes.len()];
        let mut nodes = Vec::new();
        for (old_id, node) in self.nodes.iter().enumerate() {
            if !reachable[old_id] {
                continue;
            }
            let new_id = nodes.len();
            remap[old_id] = new_id;
            let kind = match &node.kind {
                NodeKind::Input { name } => NodeKind::Input { name: name.clone() },
                NodeKind::Sum { inputs } => NodeKind::Sum {
                    inputs: inputs.iter().map(|&i| remap[i]).collect(),
                },
                NodeKind::DataNorm { input } => NodeKind::DataNorm { input: remap[*input] },
                NodeKind::Dense { input, size, activation } => NodeKind::Dense {
                    input: remap[*input],
                    size: *size,
                    activation: *activation,
                },
                NodeKind::Sigmoid { input } => NodeKind::Sigmoid { input: remap[*input] },
            };
            nodes.push(Node { id: new_id, name: node.name.clone(), kind, width: node.width });
        }

        let inputs = self
            .inputs
            .iter()
            .filter(|&&id| reachable[id])
            .map(|&id| remap[id])
            .collect();

        Graph::from_parts(nodes, inputs, remap[self.output])
    }
}
