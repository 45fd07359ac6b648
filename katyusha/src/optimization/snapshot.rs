use crate::{Result, params::ParamSet};

/// Holds the snapshot point, where the full batch gradient is evaluated once per epoch.
///
/// The tracker owns its own copy of the parameters, the driver runs the full batch pass on
/// them through `get_param_groups_mut` and refreshes their values at the end of every epoch
/// with `set_param_groups`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    params: ParamSet,
}

impl Snapshot {
    /// Creates a new `Snapshot`.
    ///
    /// # Arguments
    /// * `params` - The initial snapshot point.
    pub fn new(params: ParamSet) -> Self {
        Self { params }
    }

    pub fn get_param_groups(&self) -> &ParamSet {
        &self.params
    }

    pub fn get_param_groups_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    /// Overwrites the values of the snapshot point in place, its gradients are kept.
    ///
    /// # Arguments
    /// * `params` - The new values, must have the same layout as the tracked ones.
    pub fn set_param_groups(&mut self, params: &ParamSet) -> Result<()> {
        self.params.copy_values_from(params)
    }
}
