//! Saving and loading serialized models.
//!
//! A saved model is a pair of files in one directory: a topology descriptor
//! ([`Program`]) and the parameter values, matched to each other by
//! parameter name. Consumers treat both files as opaque.

use crate::graph::graph::Graph;
use crate::runtime::backend::Parameters;
use serde::{Serialize, Deserialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Default file name for the topology descriptor.
pub const PROGRAM_FILE: &str = "program.bin";
/// Default file name for the parameter values.
pub const MODEL_FILE: &str = "model.bin";

/// Everything a runtime consumer needs besides parameter values: the
/// inference graph, the feed names it must supply (in declaration order),
/// and the name of the node to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub graph: Graph,
    pub feed_names: Vec<String>,
    pub fetch_name: String,
}

/// Serializes a program and its parameters into `dir`, creating the
/// directory if absent (idempotent). Existing files are overwritten.
pub fn save_model(
    dir: &Path,
    program_filename: &str,
    params_filename: &str,
    program: &Program,
    params: &Parameters,
) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    write_json(&dir.join(program_filename), program)?;
    write_json(&dir.join(params_filename), params)
}

/// Reads back a model saved by [`save_model`].
pub fn load_model(
    dir: &Path,
    program_filename: &str,
    params_filename: &str,
) -> io::Result<(Program, Parameters)> {
    let program = read_json(&dir.join(program_filename))?;
    let params = read_json(&dir.join(params_filename))?;
    Ok((program, params))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> io::Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
