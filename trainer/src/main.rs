use std::env;

use log::info;

use trainer::{Result, TrainErr, specs::TrainerSpec, training::TrainerBuilder};

const CONFIG_VAR: &str = "KATYUSHA_CONFIG";

fn main() -> Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_VAR).ok())
        .ok_or_else(|| {
            TrainErr::InvalidSpec(format!(
                "expected the spec path as the first argument or in {CONFIG_VAR}"
            ))
        })?;

    let spec = TrainerSpec::load(&path)?;
    info!("loaded spec from {path}");

    let mut trainer = TrainerBuilder::new().build(&spec)?;
    let losses = trainer.train()?;

    if let Some(loss) = losses.last() {
        println!("final loss: {loss}");
    }

    for ((group, param), p) in trainer.params().params() {
        println!("group {group}, param {param}: {}", p.value());
    }

    Ok(())
}
