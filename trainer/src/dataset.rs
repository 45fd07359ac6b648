use std::num::NonZeroUsize;

use ndarray::ArrayView1;
use rand::Rng;

use crate::{Result, TrainErr};

/// An in-memory dataset of `(x, y)` samples stored row by row in a flat buffer.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: Vec<f32>,
    x_size: usize,
    y_size: usize,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `data` - The samples, each one is `x_size` inputs followed by `y_size` outputs.
    /// * `x_size` - The size of every input.
    /// * `y_size` - The size of every output.
    ///
    /// # Returns
    /// An `InvalidSpec` error if any size is zero, the dataset is empty or the buffer doesn't
    /// hold a whole amount of samples.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(TrainErr::InvalidSpec(format!(
                "x_size ({x_size}) and y_size ({y_size}) must be greater than 0"
            )));
        }

        let row_size = x_size + y_size;
        if data.len() % row_size != 0 {
            return Err(TrainErr::InvalidSpec(format!(
                "dataset length ({}) is not divisible by x_size + y_size ({row_size})",
                data.len()
            )));
        }

        if data.is_empty() {
            return Err(TrainErr::InvalidSpec(
                "dataset must have at least one sample".into(),
            ));
        }

        Ok(Self {
            data,
            x_size,
            y_size,
        })
    }

    /// The amount of samples in the dataset.
    pub fn len(&self) -> usize {
        self.data.len() / (self.x_size + self.y_size)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Returns the `(x, y)` pair of the `index`-th sample.
    pub fn sample(&self, index: usize) -> Result<(ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        let len = self.len();
        if index >= len {
            return Err(TrainErr::SampleOutOfBounds { index, len });
        }

        let start = index * (self.x_size + self.y_size);
        let (x, y) = self.data[start..start + self.x_size + self.y_size].split_at(self.x_size);

        Ok((ArrayView1::from(x), ArrayView1::from(y)))
    }
}

/// Draws minibatches of sample indices uniformly at random, with replacement.
#[derive(Debug)]
pub struct BatchSampler<R: Rng> {
    len: usize,
    batch_size: NonZeroUsize,
    rng: R,
}

impl<R: Rng> BatchSampler<R> {
    /// Creates a new `BatchSampler`.
    ///
    /// # Arguments
    /// * `len` - The amount of samples to draw from.
    /// * `batch_size` - The amount of indices per minibatch.
    /// * `rng` - A random number generator.
    pub fn new(len: usize, batch_size: NonZeroUsize, rng: R) -> Self {
        Self {
            len,
            batch_size,
            rng,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Fills `batch` with a new minibatch of indices.
    pub fn sample_into(&mut self, batch: &mut Vec<usize>) {
        batch.clear();
        batch.extend((0..self.batch_size.get()).map(|_| self.rng.random_range(0..self.len)));
    }
}
