pub mod model_io;

pub use model_io::{load_model, save_model, Program, MODEL_FILE, PROGRAM_FILE};
