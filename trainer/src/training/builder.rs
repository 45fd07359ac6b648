use katyusha::optimization::Katyusha;
use rand::{SeedableRng, rngs::StdRng};

use super::{KatyushaTrainer, Trainer};
use crate::{
    Result, TrainErr,
    arch::{LeastSquares, Objective},
    dataset::Dataset,
    specs::{DatasetSpec, OptimizerSpec, TrainerSpec},
};

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Trainer` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    ///
    /// # Returns
    /// An error if the spec is invalid, nothing is trained yet.
    pub fn build(&self, spec: &TrainerSpec) -> Result<Box<dyn Trainer>> {
        let trainer = self.build_katyusha(spec)?;
        Ok(Box::new(trainer))
    }

    /// Same as `build`, keeping the concrete trainer type.
    pub fn build_katyusha(
        &self,
        spec: &TrainerSpec,
    ) -> Result<KatyushaTrainer<LeastSquares, StdRng>> {
        let objective = self.resolve_objective(&spec.dataset)?;

        if spec.batch_size.get() > objective.num_samples() {
            return Err(TrainErr::InvalidSpec(format!(
                "batch_size ({}) exceeds dataset size ({} samples)",
                spec.batch_size,
                objective.num_samples()
            )));
        }

        let optimizer = self.resolve_optimizer(spec.optimizer)?;
        let rng = self.generate_rng(spec.seed);

        Ok(KatyushaTrainer::new(
            objective,
            optimizer,
            spec.batch_size,
            spec.epochs,
            rng,
        ))
    }

    fn resolve_objective(&self, spec: &DatasetSpec) -> Result<LeastSquares> {
        let dataset = Dataset::new(spec.data.clone(), spec.x_size, spec.y_size)?;
        Ok(LeastSquares::new(dataset))
    }

    fn resolve_optimizer(&self, spec: OptimizerSpec) -> Result<Katyusha> {
        match spec {
            OptimizerSpec::Katyusha { lips, m } => {
                Katyusha::new(lips, m).map_err(|e| TrainErr::InvalidSpec(e.to_string()))
            }
        }
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
