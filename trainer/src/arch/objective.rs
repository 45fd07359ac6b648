use katyusha::params::ParamSet;

use crate::Result;

/// A differentiable objective averaged over the samples of a dataset.
///
/// The objective doesn't own parameters, it evaluates losses and gradients at whatever point
/// it's handed, which lets the trainer query it both at the live model and at the snapshot
/// point.
pub trait Objective {
    /// The amount of samples the objective is averaged over.
    fn num_samples(&self) -> usize;

    /// Returns the starting point of the optimization.
    fn init_params(&self) -> ParamSet;

    /// Evaluates the gradient of the objective averaged over `batch` at `params`' values.
    ///
    /// Every parameter's gradient is overwritten, previous gradients never accumulate.
    ///
    /// # Errors
    /// Fails if the batch is empty, references samples out of bounds or `params` doesn't have
    /// the layout returned by `init_params`.
    fn gradient(&self, params: &mut ParamSet, batch: &[usize]) -> Result<()>;

    /// Evaluates the objective averaged over `batch` at `params`' values.
    fn loss(&self, params: &ParamSet, batch: &[usize]) -> Result<f32>;
}
