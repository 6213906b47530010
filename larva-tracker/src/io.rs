use anyhow::{Context, Result};
use bitvec::prelude::BitVec;
use larva_features::BitMask;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One mask as stored on disk: offset and extent per dimension, then the
/// bits with dimension 0 varying fastest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskRecord {
    pub min: Vec<i64>,
    pub dims: Vec<usize>,
    pub bits: Vec<bool>,
}

impl MaskRecord {
    pub fn into_mask(self) -> Result<BitMask> {
        let bits: BitVec = self.bits.into_iter().collect();
        BitMask::new(self.min, self.dims, bits)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Writes `value` to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

pub fn read_masks(path: &Path) -> Result<Vec<BitMask>> {
    let records: Vec<MaskRecord> = read_json(path)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_mask()
                .with_context(|| format!("Mask {} in {}", index, path.display()))
        })
        .collect()
}
