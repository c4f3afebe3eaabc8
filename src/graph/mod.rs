pub mod builder;
pub mod graph;
pub mod scorer;

pub use builder::GraphBuilder;
pub use graph::{Graph, GraphError, InitKind, Node, NodeId, NodeKind, ParameterSpec};
pub use scorer::{build_scorer, Scorer};
