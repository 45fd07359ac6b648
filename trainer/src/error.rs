use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use katyusha::OptErr;
use ndarray::ShapeError;

/// The result type used in the entire trainer module.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// All errors that can occur while setting up or running a training.
#[derive(Debug)]
pub enum TrainErr {
    /// The training spec is invalid, caught before training starts.
    InvalidSpec(String),
    /// A minibatch referenced a sample the dataset doesn't have.
    SampleOutOfBounds { index: usize, len: usize },
    /// A gradient or loss was requested over an empty batch.
    EmptyBatch,
    /// The optimizer rejected an operation.
    Optimizer(OptErr),
    /// A parameter tensor couldn't be viewed with the expected dimensionality.
    Shape(ShapeError),
    /// Reading the spec failed.
    Io(io::Error),
    /// The spec is not valid json for a `TrainerSpec`.
    Json(serde_json::Error),
}

impl Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpec(msg) => write!(f, "invalid spec: {msg}"),
            Self::SampleOutOfBounds { index, len } => {
                write!(f, "sample {index} is out of bounds for a dataset of {len} samples")
            }
            Self::EmptyBatch => write!(f, "the batch is empty"),
            Self::Optimizer(e) => write!(f, "optimizer error: {e}"),
            Self::Shape(e) => write!(f, "shape error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for TrainErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Optimizer(e) => Some(e),
            Self::Shape(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OptErr> for TrainErr {
    fn from(e: OptErr) -> Self {
        Self::Optimizer(e)
    }
}

impl From<ShapeError> for TrainErr {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<io::Error> for TrainErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TrainErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
