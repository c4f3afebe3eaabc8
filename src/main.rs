//! Generates a synthetic sample dataset and a freshly initialized scoring
//! model, the two artifacts an inference consumer needs:
//!
//!   data/sample.data   one line per slot: `<name>\t<v1> ... <vW>`
//!   model/program.bin  inference graph + feed/fetch names
//!   model/model.bin    parameter values
//!
//! Takes no arguments. Errors propagate out of `main` and exit non-zero.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use slotgraph::data::{read_sample_file, write_sample_file};
use slotgraph::graph::scorer::build_scorer;
use slotgraph::runtime::backend::{Backend, Feeds};
use slotgraph::runtime::cpu::CpuBackend;
use slotgraph::serialization::model_io::{load_model, save_model, Program, MODEL_FILE, PROGRAM_FILE};
use slotgraph::slots::generate_slots;

const NUM_SLOTS: usize = 20;
const EMB_SIZE: usize = 11;

const DATA_DIR: &str = "data";
const MODEL_DIR: &str = "model";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // One slot sequence shared by the data writer and the graph assembler,
    // so sample.data names always match the saved program's feed names.
    let mut rng = StdRng::from_entropy();
    let slots = generate_slots(NUM_SLOTS, EMB_SIZE, &mut rng);

    let sample_path = write_sample_file(Path::new(DATA_DIR), &slots, &mut rng)?;
    info!("wrote {} sample rows to {}", slots.len(), sample_path.display());

    let scorer = build_scorer(&slots)?;
    for node in scorer.graph.nodes() {
        debug!("variable: {}", node.name);
    }
    for spec in scorer.graph.parameters() {
        info!("parameter: {} [{}x{}]", spec.name, spec.rows, spec.cols);
    }

    let mut backend = CpuBackend::new();
    let params = backend.initialize(&scorer.graph)?;

    let program = Program {
        graph: scorer.graph.inference_clone(),
        feed_names: scorer.feed_names.clone(),
        fetch_name: scorer.fetch_name.clone(),
    };
    save_model(Path::new(MODEL_DIR), PROGRAM_FILE, MODEL_FILE, &program, &params)?;
    info!(
        "saved model to {}/{{{},{}}} (fetch '{}')",
        MODEL_DIR, PROGRAM_FILE, MODEL_FILE, program.fetch_name
    );

    // Round trip: reload the saved model and score the generated sample,
    // the same path an inference consumer takes.
    let (program, params) = load_model(Path::new(MODEL_DIR), PROGRAM_FILE, MODEL_FILE)?;
    let feeds: Feeds = read_sample_file(&sample_path)?
        .into_iter()
        .map(|row| (row.slot, row.values))
        .collect();
    let score = backend.run(&program.graph, &params, &feeds)?;
    info!("score for generated sample: {:.6}", score[0]);

    Ok(())
}
