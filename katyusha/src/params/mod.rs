mod group;
mod param;
mod set;

pub use group::ParamGroup;
pub use param::Param;
pub use set::ParamSet;
