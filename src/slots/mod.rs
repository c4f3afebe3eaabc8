//! Feature slots: named input channels with a fixed vector width.
//!
//! The slot sequence is generated exactly once per run and handed to both
//! the sample-data writer and the graph assembler, so the names in
//! `sample.data` always match the input placeholders of the saved program.

use rand::Rng;

/// Length of the random lowercase token prefixing each slot name.
const TOKEN_LEN: usize = 4;

/// A named input feature channel with a fixed vector width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub width: usize,
}

impl Slot {
    pub fn new(name: impl Into<String>, width: usize) -> Slot {
        Slot { name: name.into(), width }
    }
}

/// Generates `count` slots of the given `width`.
///
/// Names are a 4-letter random token plus the positional index
/// (e.g. `qkzv_3`). The index suffix makes names unique within a run even
/// if two tokens collide. Pass a seeded rng for reproducible names.
pub fn generate_slots<R: Rng>(count: usize, width: usize, rng: &mut R) -> Vec<Slot> {
    (0..count)
        .map(|i| Slot::new(format!("{}_{}", random_token(rng), i), width))
        .collect()
}

fn random_token<R: Rng>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}
