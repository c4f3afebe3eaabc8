//! Sample-data reader, the counterpart of [`generator`](super::generator).
//!
//! Used by inference-side consumers that feed a saved program from a
//! `sample.data` file.

use std::fs;
use std::io;
use std::path::Path;

/// One parsed line of a sample file: a slot name plus its feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub slot: String,
    pub values: Vec<f32>,
}

/// Reads every row of a sample file.
pub fn read_sample_file(path: &Path) -> io::Result<Vec<SampleRow>> {
    read_sample_lines(path, 0, usize::MAX)
}

/// Reads rows within a line range. `start_line` and `end_line` are both
/// inclusive, zero-based; a range past the end of the file simply yields
/// fewer rows.
pub fn read_sample_lines(path: &Path, start_line: usize, end_line: usize) -> io::Result<Vec<SampleRow>> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        if line_no < start_line {
            continue;
        }
        if line_no > end_line {
            break;
        }
        rows.push(parse_row(line, line_no)?);
    }

    Ok(rows)
}

fn parse_row(line: &str, line_no: usize) -> io::Result<SampleRow> {
    let mut fields = line.split_whitespace();
    let slot = fields
        .next()
        .ok_or_else(|| malformed(line_no, "empty line"))?
        .to_string();

    let values = fields
        .map(|field| {
            field
                .parse::<f32>()
                .map_err(|_| malformed(line_no, &format!("bad value '{field}'")))
        })
        .collect::<io::Result<Vec<f32>>>()?;

    if values.is_empty() {
        return Err(malformed(line_no, "no values after slot name"));
    }

    Ok(SampleRow { slot, values })
}

fn malformed(line_no: usize, detail: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed sample line {line_no}: {detail}"),
    )
}
