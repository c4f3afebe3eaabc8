//! Mutable graph-construction context.
//!
//! The builder accumulates typed nodes, checks widths as edges are added,
//! and [`finish`](GraphBuilder::finish) seals the result into an immutable
//! [`Graph`]. Layer nodes are auto-named with per-kind counters (`fc_0`,
//! `fc_1`, `data_norm_0`, ...), which is also where parameter names come
//! from.

use crate::activation::activation::ActivationFunction;
use crate::graph::graph::{Graph, GraphError, Node, NodeId, NodeKind};

#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    inputs: Vec<NodeId>,
    next_sum: usize,
    next_data_norm: usize,
    next_fc: usize,
    next_sigmoid: usize,
}

impl GraphBuilder {
    pub fn new() -> GraphBuilder {
        GraphBuilder::default()
    }

    fn push(&mut self, name: String, kind: NodeKind, width: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { id, name, kind, width });
        id
    }

    fn width_of(&self, id: NodeId) -> Result<usize, GraphError> {
        self.nodes
            .get(id)
            .map(|node| node.width)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Declares a runtime-fed input placeholder of the given width.
    pub fn input(&mut self, name: &str, width: usize) -> NodeId {
        let id = self.push(name.to_string(), NodeKind::Input { name: name.to_string() }, width);
        self.inputs.push(id);
        id
    }

    /// Element-wise sum over any number of same-width operands.
    pub fn sum(&mut self, inputs: &[NodeId]) -> Result<NodeId, GraphError> {
        let (&first, rest) = inputs.split_first().ok_or(GraphError::EmptySum)?;
        let width = self.width_of(first)?;
        for &id in rest {
            let found = self.width_of(id)?;
            if found != width {
                return Err(GraphError::WidthMismatch { expected: width, found });
            }
        }
        let name = format!("sum_{}", self.next_sum);
        self.next_sum += 1;
        Ok(self.push(name, NodeKind::Sum { inputs: inputs.to_vec() }, width))
    }

    /// Batch-statistics normalization; width-preserving.
    pub fn data_norm(&mut self, input: NodeId) -> Result<NodeId, GraphError> {
        let width = self.width_of(input)?;
        let name = format!("data_norm_{}", self.next_data_norm);
        self.next_data_norm += 1;
        Ok(self.push(name, NodeKind::DataNorm { input }, width))
    }

    /// Fully connected layer of `size` units with the given activation.
    pub fn dense(
        &mut self,
        input: NodeId,
        size: usize,
        activation: ActivationFunction,
    ) -> Result<NodeId, GraphError> {
        if size == 0 {
            return Err(GraphError::ZeroSizeDense);
        }
        self.width_of(input)?;
        let name = format!("fc_{}", self.next_fc);
        self.next_fc += 1;
        Ok(self.push(name, NodeKind::Dense { input, size, activation }, size))
    }

    /// Element-wise sigmoid; width-preserving.
    pub fn sigmoid(&mut self, input: NodeId) -> Result<NodeId, GraphError> {
        let width = self.width_of(input)?;
        let name = format!("sigmoid_{}", self.next_sigmoid);
        self.next_sigmoid += 1;
        Ok(self.push(name, NodeKind::Sigmoid { input }, width))
    }

    /// Seals the builder into an immutable graph with the given output node.
    pub fn finish(self, output: NodeId) -> Result<Graph, GraphError> {
        if output >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(output));
        }
        Ok(Graph::from_parts(self.nodes, self.inputs, output))
    }
}
