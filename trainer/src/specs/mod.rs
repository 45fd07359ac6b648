use std::{fs::File, io::BufReader, num::NonZeroUsize, path::Path};

use katyusha::optimization::{DEFAULT_LIPS, DEFAULT_M};
use serde::{Deserialize, Serialize};

use crate::Result;

/// The specification for the optimizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Katyusha {
        #[serde(default = "default_lips")]
        lips: f32,
        #[serde(default = "default_m")]
        m: usize,
    },
}

fn default_lips() -> f32 {
    DEFAULT_LIPS
}

fn default_m() -> usize {
    DEFAULT_M
}

/// The specification for the `Dataset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub data: Vec<f32>,
    pub x_size: usize,
    pub y_size: usize,
}

/// The specification for a whole training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub optimizer: OptimizerSpec,
    pub dataset: DatasetSpec,
    pub epochs: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub seed: Option<u64>,
}

impl TrainerSpec {
    /// Reads a `TrainerSpec` from a json file.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let spec = serde_json::from_reader(reader)?;
        Ok(spec)
    }
}
