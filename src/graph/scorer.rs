//! The fixed scorer topology over a set of feature slots.

use crate::activation::activation::ActivationFunction;
use crate::graph::builder::GraphBuilder;
use crate::graph::graph::{Graph, GraphError, NodeId};
use crate::slots::Slot;

/// Units in the hidden dense layer.
pub const HIDDEN_SIZE: usize = 8;
/// Units in the output dense layer.
pub const OUTPUT_SIZE: usize = 1;

/// An assembled scoring graph plus the names a runtime consumer needs:
/// feeds in declaration order and the designated output node.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub graph: Graph,
    pub feed_names: Vec<String>,
    pub fetch_name: String,
    pub output: NodeId,
}

/// Assembles the scorer over the given slots:
///
/// one input per slot → sum → data-norm → dense(8, relu) → dense(1) →
/// sigmoid, yielding one scalar per example. The shape of the topology is
/// invariant to the slot count; only the sum's fan-in changes. All slots
/// must share one width.
pub fn build_scorer(slots: &[Slot]) -> Result<Scorer, GraphError> {
    let mut builder = GraphBuilder::new();

    let bows: Vec<NodeId> = slots
        .iter()
        .map(|slot| builder.input(&slot.name, slot.width))
        .collect();

    let bow_sum = builder.sum(&bows)?;
    let norm = builder.data_norm(bow_sum)?;
    let fc1 = builder.dense(norm, HIDDEN_SIZE, ActivationFunction::ReLU)?;
    let fc2 = builder.dense(fc1, OUTPUT_SIZE, ActivationFunction::Identity)?;
    let output = builder.sigmoid(fc2)?;

    let graph = builder.finish(output)?;
    let feed_names = graph.input_names();
    let fetch_name = graph.node(output)?.name.clone();

    Ok(Scorer { graph, feed_names, fetch_name, output })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph::NodeKind;

    fn fixed_slots() -> Vec<Slot> {
        vec![
            Slot::new("aaaa_0", 2),
            Slot::new("bbbb_1", 2),
            Slot::new("cccc_2", 2),
        ]
    }

    #[test]
    fn declares_one_input_per_slot_in_order() {
        let scorer = build_scorer(&fixed_slots()).unwrap();
        assert_eq!(scorer.feed_names, vec!["aaaa_0", "bbbb_1", "cccc_2"]);
        for &id in scorer.graph.inputs() {
            assert_eq!(scorer.graph.node(id).unwrap().width, 2);
        }
    }

    #[test]
    fn topology_is_the_fixed_chain() {
        let scorer = build_scorer(&fixed_slots()).unwrap();
        let graph = &scorer.graph;

        // inputs -> sum -> data_norm -> fc(8, relu) -> fc(1) -> sigmoid
        let sigmoid = graph.node(scorer.output).unwrap();
        let fc2 = match &sigmoid.kind {
            NodeKind::Sigmoid { input } => graph.node(*input).unwrap(),
            other => panic!("expected sigmoid output, got {other:?}"),
        };
        let fc1 = match &fc2.kind {
            NodeKind::Dense { input, size: 1, activation: ActivationFunction::Identity } => {
                graph.node(*input).unwrap()
            }
            other => panic!("expected dense(1) layer, got {other:?}"),
        };
        let norm = match &fc1.kind {
            NodeKind::Dense { input, size: 8, activation: ActivationFunction::ReLU } => {
                graph.node(*input).unwrap()
            }
            other => panic!("expected dense(8, relu) layer, got {other:?}"),
        };
        let sum = match &norm.kind {
            NodeKind::DataNorm { input } => graph.node(*input).unwrap(),
            other => panic!("expected data_norm layer, got {other:?}"),
        };
        match &sum.kind {
            NodeKind::Sum { inputs } => assert_eq!(inputs.len(), 3),
            other => panic!("expected sum node, got {other:?}"),
        }
    }

    #[test]
    fn output_is_a_single_scalar_for_any_slot_count() {
        for count in [1usize, 3, 20] {
            let slots: Vec<Slot> = (0..count)
                .map(|i| Slot::new(format!("slot_{i}"), 11))
                .collect();
            let scorer = build_scorer(&slots).unwrap();
            assert_eq!(scorer.graph.node(scorer.output).unwrap().width, 1);
            assert_eq!(scorer.fetch_name, "sigmoid_0");
        }
    }

    #[test]
    fn rejects_slots_of_differing_widths() {
        let slots = vec![Slot::new("a_0", 2), Slot::new("b_1", 3)];
        let err = build_scorer(&slots).unwrap_err();
        assert_eq!(err, GraphError::WidthMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn rejects_an_empty_slot_list() {
        assert_eq!(build_scorer(&[]).unwrap_err(), GraphError::EmptySum);
    }
}
