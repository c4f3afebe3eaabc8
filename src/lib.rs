pub mod activation;
pub mod data;
pub mod graph;
pub mod math;
pub mod runtime;
pub mod serialization;
pub mod slots;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use graph::builder::GraphBuilder;
pub use graph::graph::{Graph, GraphError, NodeId};
pub use graph::scorer::{build_scorer, Scorer};
pub use math::matrix::Matrix;
pub use runtime::backend::{Backend, Feeds, Parameters, RuntimeError};
pub use runtime::cpu::CpuBackend;
pub use serialization::model_io::{load_model, save_model, Program};
pub use slots::Slot;
