use super::{Param, ParamGroup};
use crate::{OptErr, Result};

/// An ordered collection of parameter groups.
///
/// Every set the optimizers exchange must share the same layout: the same amount of groups,
/// the same amount of parameters per group and the same shape per parameter. The copy
/// operations below validate that before touching any value, so a failed copy leaves the
/// destination as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    groups: Vec<ParamGroup>,
}

impl ParamSet {
    /// Creates a new `ParamSet`.
    ///
    /// # Arguments
    /// * `groups` - The parameter groups, in order.
    pub fn new(groups: Vec<ParamGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[ParamGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [ParamGroup] {
        &mut self.groups
    }

    /// The amount of groups in the set.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The total amount of parameters across every group.
    pub fn num_params(&self) -> usize {
        self.groups.iter().map(ParamGroup::len).sum()
    }

    /// Iterates every parameter in order, alongside its `(group, param)` position.
    pub fn params(&self) -> impl Iterator<Item = ((usize, usize), &Param)> {
        self.groups.iter().enumerate().flat_map(|(g, group)| {
            group
                .params()
                .iter()
                .enumerate()
                .map(move |(p, param)| ((g, p), param))
        })
    }

    /// Iterates every parameter mutably in order, alongside its `(group, param)` position.
    pub fn params_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Param)> {
        self.groups.iter_mut().enumerate().flat_map(|(g, group)| {
            group
                .params_mut()
                .iter_mut()
                .enumerate()
                .map(move |(p, param)| ((g, p), param))
        })
    }

    /// Checks that `other` has exactly the same layout as this set.
    ///
    /// # Arguments
    /// * `other` - The set to compare against.
    /// * `what` - A name for `other` used in the error.
    ///
    /// # Returns
    /// A `ShapeMismatch` error pointing at the first difference found.
    pub fn check_layout(&self, other: &ParamSet, what: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(OptErr::ShapeMismatch {
                what,
                group: None,
                param: None,
                got: vec![other.len()],
                expected: vec![self.len()],
            });
        }

        for (g, (mine, theirs)) in self.groups.iter().zip(&other.groups).enumerate() {
            if mine.len() != theirs.len() {
                return Err(OptErr::ShapeMismatch {
                    what,
                    group: Some(g),
                    param: None,
                    got: vec![theirs.len()],
                    expected: vec![mine.len()],
                });
            }

            for (p, (a, b)) in mine.params().iter().zip(theirs.params()).enumerate() {
                if a.shape() != b.shape() {
                    return Err(OptErr::ShapeMismatch {
                        what,
                        group: Some(g),
                        param: Some(p),
                        got: b.shape().to_vec(),
                        expected: a.shape().to_vec(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Checks that every parameter in the set carries a gradient.
    ///
    /// # Returns
    /// A `MissingGradient` error for the first parameter without one.
    pub fn require_grads(&self) -> Result<()> {
        match self.params().find(|(_, p)| p.grad().is_none()) {
            Some(((group, param), _)) => Err(OptErr::MissingGradient { group, param }),
            None => Ok(()),
        }
    }

    /// Returns a newly allocated copy of this set's values, without gradients.
    pub fn value_copy(&self) -> ParamSet {
        self.groups
            .iter()
            .map(|group| group.params().iter().map(Param::value_copy).collect())
            .collect()
    }

    /// Copies the values of `src` into this set in place, gradients are left untouched.
    ///
    /// # Arguments
    /// * `src` - The set to copy the values from, must have the same layout.
    pub fn copy_values_from(&mut self, src: &ParamSet) -> Result<()> {
        self.check_layout(src, "values")?;

        for ((_, dst), (_, src)) in self.params_mut().zip(src.params()) {
            dst.value_mut().assign(src.value());
        }

        Ok(())
    }

    /// Replaces the gradients of this set with copies of the ones in `src`.
    ///
    /// A parameter whose counterpart in `src` has no gradient ends up without one.
    ///
    /// # Arguments
    /// * `src` - The set to copy the gradients from, must have the same layout.
    pub fn copy_grads_from(&mut self, src: &ParamSet) -> Result<()> {
        self.check_layout(src, "gradients")?;

        for ((_, dst), (_, src)) in self.params_mut().zip(src.params()) {
            let Some(grad) = src.grad() else {
                dst.take_grad();
                continue;
            };

            match dst.grad_mut() {
                Some(mut dst_grad) => dst_grad.assign(grad),
                None => dst.set_grad(Some(grad.clone()))?,
            }
        }

        Ok(())
    }

    /// Sets every value of every parameter to zero.
    pub fn zero_values(&mut self) {
        for (_, param) in self.params_mut() {
            param.value_mut().fill(0.);
        }
    }
}

impl From<Vec<ParamGroup>> for ParamSet {
    fn from(groups: Vec<ParamGroup>) -> Self {
        Self::new(groups)
    }
}

impl FromIterator<ParamGroup> for ParamSet {
    fn from_iter<I: IntoIterator<Item = ParamGroup>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
