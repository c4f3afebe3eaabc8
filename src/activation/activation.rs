use serde::{Serialize, Deserialize};
use std::f32::consts::E;

/// Activations used by dense layers in a scoring graph. Stored in the
/// serialized program descriptor, so the set is kept serde-stable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
}

impl ActivationFunction {
    /// Element-wise activation.
    pub fn function(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
        }
    }
}
