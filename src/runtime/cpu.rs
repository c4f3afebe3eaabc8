//! Single-threaded CPU backend.

use crate::graph::graph::{Graph, InitKind, NodeKind};
use crate::math::matrix::Matrix;
use crate::runtime::backend::{Backend, Feeds, Parameters, RuntimeError};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Evaluates graphs on the host CPU.
///
/// `new()` seeds the initializer rng from entropy, matching the original
/// demo's unseeded behavior; `with_seed` pins it for reproducible tests.
#[derive(Debug)]
pub struct CpuBackend {
    rng: StdRng,
}

impl CpuBackend {
    pub fn new() -> CpuBackend {
        CpuBackend { rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> CpuBackend {
        CpuBackend { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        CpuBackend::new()
    }
}

impl Backend for CpuBackend {
    fn initialize(&mut self, graph: &Graph) -> Result<Parameters, RuntimeError> {
        let mut params = Parameters::new();
        for spec in graph.parameters() {
            let value = match spec.init {
                InitKind::He => Matrix::he(spec.rows, spec.cols, &mut self.rng),
                InitKind::Xavier => Matrix::xavier(spec.rows, spec.cols, &mut self.rng),
                InitKind::Zeros => Matrix::zeros(spec.rows, spec.cols),
                InitKind::Filled(value) => Matrix::filled(spec.rows, spec.cols, value),
            };
            params.insert(spec.name, value);
        }
        Ok(params)
    }

    fn run(&self, graph: &Graph, params: &Parameters, feeds: &Feeds) -> Result<Vec<f32>, RuntimeError> {
        let output = graph.output();
        if output >= graph.nodes().len() {
            return Err(RuntimeError::NodeNotFound(output));
        }

        // Nodes only reference earlier ids, so a single pass in id order
        // visits every operand before its consumer.
        let mut values: Vec<Vec<f32>> = Vec::with_capacity(graph.nodes().len());
        for node in graph.nodes() {
            let value = match &node.kind {
                NodeKind::Input { name } => {
                    let feed = feeds
                        .get(name)
                        .ok_or_else(|| RuntimeError::MissingInput(name.clone()))?;
                    if feed.len() != node.width {
                        return Err(RuntimeError::FeedWidthMismatch {
                            name: name.clone(),
                            expected: node.width,
                            found: feed.len(),
                        });
                    }
                    feed.clone()
                }
                NodeKind::Sum { inputs } => {
                    let mut acc = vec![0.0; node.width];
                    for &id in inputs {
                        for (a, x) in acc.iter_mut().zip(&values[id]) {
                            *a += x;
                        }
                    }
                    acc
                }
                NodeKind::DataNorm { input } => {
                    let size = param(params, &node.name, "batch_size")?;
                    let sum = param(params, &node.name, "batch_sum")?;
                    let square_sum = param(params, &node.name, "batch_square_sum")?;
                    values[*input]
                        .iter()
                        .enumerate()
                        .map(|(i, &x)| {
                            let mean = sum.data[0][i] / size.data[0][i];
                            let stddev = (square_sum.data[0][i] / size.data[0][i]).sqrt();
                            (x - mean) / stddev
                        })
                        .collect()
                }
                NodeKind::Dense { input, activation, .. } => {
                    let weight = param(params, &node.name, "w_0")?;
                    let bias = param(params, &node.name, "b_0")?;
                    let x = Matrix::from_data(vec![values[*input].clone()]);
                    let z = x * weight.clone() + bias.clone();
                    let a = z.map(|v| activation.function(v));
                    a.data[0].clone()
                }
                NodeKind::Sigmoid { input } => values[*input]
                    .iter()
                    .map(|&x| 1.0 / (1.0 + (-x).exp()))
                    .collect(),
            };
            values.push(value);
        }

        Ok(values[output].clone())
    }
}

fn param<'a>(params: &'a Parameters, node: &str, suffix: &str) -> Result<&'a Matrix, RuntimeError> {
    let name = format!("{node}.{suffix}");
    params
        .get(&name)
        .ok_or(RuntimeError::MissingParameter(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::scorer::build_scorer;
    use crate::slots::Slot;

    fn fixed_slots() -> Vec<Slot> {
        vec![
            Slot::new("aaaa_0", 2),
            Slot::new("bbbb_1", 2),
            Slot::new("cccc_2", 2),
        ]
    }

    fn unit_feeds(slots: &[Slot]) -> Feeds {
        slots
            .iter()
            .map(|s| (s.name.clone(), vec![0.5; s.width]))
            .collect()
    }

    #[test]
    fn initialize_creates_every_declared_parameter() {
        let scorer = build_scorer(&fixed_slots()).unwrap();
        let mut backend = CpuBackend::with_seed(1);
        let params = backend.initialize(&scorer.graph).unwrap();

        let expected: Vec<String> = scorer
            .graph
            .parameters()
            .into_iter()
            .map(|p| p.name)
            .collect();
        let mut got: Vec<String> = params.keys().cloned().collect();
        got.sort();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort();
        assert_eq!(got, expected_sorted);

        let weight = &params["fc_0.w_0"];
        assert_eq!((weight.rows, weight.cols), (2, 8));
        let bias = &params["fc_1.b_0"];
        assert_eq!((bias.rows, bias.cols), (1, 1));
        assert!(bias.data[0].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn fresh_data_norm_statistics_are_the_identity_transform() {
        let scorer = build_scorer(&fixed_slots()).unwrap();
        let mut backend = CpuBackend::with_seed(2);
        let params = backend.initialize(&scorer.graph).unwrap();

        let size = &params["data_norm_0.batch_size"];
        let square_sum = &params["data_norm_0.batch_square_sum"];
        let sum = &params["data_norm_0.batch_sum"];
        for i in 0..2 {
            let mean = sum.data[0][i] / size.data[0][i];
            let stddev = (square_sum.data[0][i] / size.data[0][i]).sqrt();
            assert_eq!(mean, 0.0);
            assert_eq!(stddev, 1.0);
        }
    }

    #[test]
    fn run_yields_one_score_in_the_open_unit_interval() {
        let slots = fixed_slots();
        let scorer = build_scorer(&slots).unwrap();
        let mut backend = CpuBackend::with_seed(3);
        let params = backend.initialize(&scorer.graph).unwrap();

        let score = backend.run(&scorer.graph, &params, &unit_feeds(&slots)).unwrap();
        assert_eq!(score.len(), 1);
        assert!(score[0] > 0.0 && score[0] < 1.0);
    }

    #[test]
    fn same_seed_same_score() {
        let slots = fixed_slots();
        let scorer = build_scorer(&slots).unwrap();
        let feeds = unit_feeds(&slots);

        let mut a = CpuBackend::with_seed(17);
        let mut b = CpuBackend::with_seed(17);
        let params_a = a.initialize(&scorer.graph).unwrap();
        let params_b = b.initialize(&scorer.graph).unwrap();
        assert_eq!(params_a, params_b);

        let score_a = a.run(&scorer.graph, &params_a, &feeds).unwrap();
        let score_b = b.run(&scorer.graph, &params_b, &feeds).unwrap();
        assert_eq!(score_a, score_b);
    }

    #[test]
    fn missing_feed_is_reported_by_name() {
        let slots = fixed_slots();
        let scorer = build_scorer(&slots).unwrap();
        let mut backend = CpuBackend::with_seed(4);
        let params = backend.initialize(&scorer.graph).unwrap();

        let mut feeds = unit_feeds(&slots);
        feeds.remove("bbbb_1");
        let err = backend.run(&scorer.graph, &params, &feeds).unwrap_err();
        assert_eq!(err, RuntimeError::MissingInput("bbbb_1".to_string()));
    }

    #[test]
    fn wrong_feed_width_is_rejected() {
        let slots = fixed_slots();
        let scorer = build_scorer(&slots).unwrap();
        let mut backend = CpuBackend::with_seed(5);
        let params = backend.initialize(&scorer.graph).unwrap();

        let mut feeds = unit_feeds(&slots);
        feeds.insert("aaaa_0".to_string(), vec![0.5; 7]);
        let err = backend.run(&scorer.graph, &params, &feeds).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::FeedWidthMismatch {
                name: "aaaa_0".to_string(),
                expected: 2,
                found: 7,
            }
        );
    }

    #[test]
    fn missing_parameter_is_reported_by_name() {
        let slots = fixed_slots();
        let scorer = build_scorer(&slots).unwrap();
        let mut backend = CpuBackend::with_seed(6);
        let mut params = backend.initialize(&scorer.graph).unwrap();
        params.remove("fc_1.w_0");

        let err = backend.run(&scorer.graph, &params, &unit_feeds(&slots)).unwrap_err();
        assert_eq!(err, RuntimeError::MissingParameter("fc_1.w_0".to_string()));
    }
}
