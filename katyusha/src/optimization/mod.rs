mod katyusha;
mod snapshot;

pub use katyusha::{DEFAULT_LIPS, DEFAULT_M, Katyusha, TAU_2};
pub use snapshot::Snapshot;
