mod least_squares;
mod objective;

pub use least_squares::LeastSquares;
pub use objective::Objective;
