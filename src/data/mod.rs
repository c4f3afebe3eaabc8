pub mod generator;
pub mod reader;

pub use generator::{write_sample_file, SAMPLE_FILE};
pub use reader::{read_sample_file, read_sample_lines, SampleRow};
