use super::Param;

/// An ordered sequence of parameters that are optimized together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamGroup {
    params: Vec<Param>,
}

impl ParamGroup {
    /// Creates a new `ParamGroup`.
    ///
    /// # Arguments
    /// * `params` - The parameters of the group, in order.
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut [Param] {
        &mut self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Param> for ParamGroup {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
