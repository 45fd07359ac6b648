use katyusha::params::ParamSet;

use crate::Result;

/// A model `Trainer`, runs a whole training and exposes the trained parameters.
pub trait Trainer {
    /// Trains the model.
    ///
    /// # Returns
    /// The loss over the whole dataset after each epoch.
    fn train(&mut self) -> Result<Vec<f32>>;

    /// The current parameters of the model.
    fn params(&self) -> &ParamSet;
}
