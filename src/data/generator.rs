//! Synthetic sample-data writer.

use crate::slots::Slot;
use rand::Rng;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the generated dataset inside the data directory.
pub const SAMPLE_FILE: &str = "sample.data";

/// Writes one line per slot to `<dir>/sample.data`:
///
/// ```text
/// <slot_name>\t<v1> <v2> ... <vW>
/// ```
///
/// Values are uniform in [0, 1) rendered with two decimal places. The data
/// directory is created if absent, and an existing sample file is truncated,
/// so re-running never appends. Returns the path of the written file.
pub fn write_sample_file<R: Rng>(dir: &Path, slots: &[Slot], rng: &mut R) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SAMPLE_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);

    for slot in slots {
        let values = (0..slot.width)
            .map(|_| format!("{:.2}", rng.gen::<f32>()))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}\t{}", slot.name, values)?;
    }

    writer.flush()?;
    Ok(path)
}
