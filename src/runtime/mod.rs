pub mod backend;
pub mod cpu;

pub use backend::{Backend, Feeds, Parameters, RuntimeError};
pub use cpu::CpuBackend;
