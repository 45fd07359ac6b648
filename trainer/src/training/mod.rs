mod builder;
mod katyusha_trainer;
mod trainer;

pub use builder::TrainerBuilder;
pub use katyusha_trainer::KatyushaTrainer;
pub use trainer::Trainer;
