use std::num::NonZeroUsize;

use katyusha::{
    optimization::{Katyusha, Snapshot},
    params::ParamSet,
};
use log::{debug, info};
use rand::Rng;

use super::Trainer;
use crate::{Result, arch::Objective, dataset::BatchSampler};

/// Trains the parameters of an `Objective` with the Katyusha optimizer.
///
/// Every epoch:
///
/// 1. The full batch gradient is evaluated at the snapshot point and handed to the optimizer.
/// 2. `m` inner iterations run, each one evaluating a minibatch gradient at the optimizer's
///    current iterate (through the live model) and at the snapshot point.
/// 3. The optimizer's average output becomes the next snapshot point.
pub struct KatyushaTrainer<O, R>
where
    O: Objective,
    R: Rng,
{
    objective: O,
    optimizer: Katyusha,
    snapshot: Snapshot,
    model: ParamSet,

    full_batch: Vec<usize>,
    sampler: BatchSampler<R>,
    epochs: NonZeroUsize,
}

impl<O, R> KatyushaTrainer<O, R>
where
    O: Objective,
    R: Rng,
{
    /// Returns a new `KatyushaTrainer` starting at the objective's initial parameters.
    ///
    /// # Arguments
    /// * `objective` - The objective to minimize.
    /// * `optimizer` - A fresh optimizer, it must not have received a snapshot point yet.
    /// * `batch_size` - The amount of samples per minibatch.
    /// * `epochs` - The amount of epochs to run per `train` call.
    /// * `rng` - A random number generator used to draw the minibatches.
    pub fn new(
        objective: O,
        optimizer: Katyusha,
        batch_size: NonZeroUsize,
        epochs: NonZeroUsize,
        rng: R,
    ) -> Self {
        let model = objective.init_params();
        let snapshot = Snapshot::new(model.clone());
        let full_batch = (0..objective.num_samples()).collect();
        let sampler = BatchSampler::new(objective.num_samples(), batch_size, rng);

        Self {
            objective,
            optimizer,
            snapshot,
            model,
            full_batch,
            sampler,
            epochs,
        }
    }

    pub fn optimizer(&self) -> &Katyusha {
        &self.optimizer
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Runs a single epoch.
    ///
    /// # Returns
    /// The full batch loss at the new snapshot point.
    pub fn epoch(&mut self) -> Result<f32> {
        let snapshot = self.snapshot.get_param_groups_mut();
        self.objective.gradient(snapshot, &self.full_batch)?;
        self.optimizer.set_outparam(self.snapshot.get_param_groups())?;

        let mut at_snapshot = self.optimizer.snapshot_point()?.value_copy();
        let mut batch = Vec::with_capacity(self.sampler.batch_size());

        for _ in 0..self.optimizer.m() {
            self.optimizer.compute_xk()?;
            self.model.copy_values_from(self.optimizer.current_iterate()?)?;

            self.sampler.sample_into(&mut batch);
            self.objective.gradient(&mut self.model, &batch)?;
            self.optimizer.load_grads(&self.model)?;

            self.objective.gradient(&mut at_snapshot, &batch)?;
            self.optimizer.step(&at_snapshot)?;
        }

        self.snapshot.set_param_groups(self.optimizer.get_param_groups()?)?;
        self.model.copy_values_from(self.snapshot.get_param_groups())?;

        let loss = self
            .objective
            .loss(self.snapshot.get_param_groups(), &self.full_batch)?;

        debug!(
            epoch = self.optimizer.epoch(),
            tau_1 = self.optimizer.tau_1(),
            alpha = self.optimizer.alpha();
            "epoch finished"
        );

        Ok(loss)
    }

    /// Performs `epochs` epochs of training.
    ///
    /// # Returns
    /// The full batch loss after each epoch.
    pub fn train(&mut self) -> Result<Vec<f32>> {
        let epochs = self.epochs.get();
        let mut losses = Vec::with_capacity(epochs);

        for _ in 0..epochs {
            let loss = self.epoch()?;
            info!("epoch {}: loss {loss}", self.optimizer.epoch());
            losses.push(loss);
        }

        Ok(losses)
    }

    /// The parameters of the model, the latest snapshot point.
    pub fn params(&self) -> &ParamSet {
        self.snapshot.get_param_groups()
    }
}

impl<O, R> Trainer for KatyushaTrainer<O, R>
where
    O: Objective,
    R: Rng,
{
    fn train(&mut self) -> Result<Vec<f32>> {
        self.train()
    }

    fn params(&self) -> &ParamSet {
        self.params()
    }
}
