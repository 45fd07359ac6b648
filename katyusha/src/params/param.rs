use ndarray::{ArrayD, ArrayViewMutD, IxDyn};

use crate::{OptErr, Result};

/// A single trainable tensor together with the gradient evaluated at it, if any.
///
/// The gradient, when present, always has the same shape as the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    value: ArrayD<f32>,
    grad: Option<ArrayD<f32>>,
}

impl Param {
    /// Creates a new `Param` without a gradient.
    ///
    /// # Arguments
    /// * `value` - The values of the parameter.
    pub fn new(value: ArrayD<f32>) -> Self {
        Self { value, grad: None }
    }

    /// Creates a new `Param` carrying a gradient.
    ///
    /// # Arguments
    /// * `value` - The values of the parameter.
    /// * `grad` - The gradient evaluated at `value`.
    ///
    /// # Returns
    /// A `ShapeMismatch` error if the gradient's shape differs from the value's.
    pub fn with_grad(value: ArrayD<f32>, grad: ArrayD<f32>) -> Result<Self> {
        let mut param = Self::new(value);
        param.set_grad(Some(grad))?;
        Ok(param)
    }

    /// Builds a `Param` of the given shape from a flat row-major buffer.
    ///
    /// # Arguments
    /// * `shape` - The shape of the parameter.
    /// * `data` - The values, its length must be the product of `shape`.
    pub fn from_shape_vec(shape: &[usize], data: Vec<f32>) -> Result<Self> {
        let value = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| OptErr::InvalidArgument(e.to_string()))?;

        Ok(Self::new(value))
    }

    /// Creates a zero valued `Param` of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::new(ArrayD::zeros(IxDyn(shape)))
    }

    pub fn value(&self) -> &ArrayD<f32> {
        &self.value
    }

    /// A mutable view of the values, it can't change their shape.
    pub fn value_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.value.view_mut()
    }

    pub fn grad(&self) -> Option<&ArrayD<f32>> {
        self.grad.as_ref()
    }

    /// A mutable view of the gradient, use `set_grad` to replace it with another array.
    pub fn grad_mut(&mut self) -> Option<ArrayViewMutD<'_, f32>> {
        self.grad.as_mut().map(|grad| grad.view_mut())
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    /// Replaces the gradient of this parameter.
    ///
    /// # Arguments
    /// * `grad` - The new gradient, `None` removes the current one.
    ///
    /// # Returns
    /// A `ShapeMismatch` error if the gradient's shape differs from the value's, in which
    /// case the current gradient is kept.
    pub fn set_grad(&mut self, grad: Option<ArrayD<f32>>) -> Result<()> {
        if let Some(grad) = &grad {
            if grad.shape() != self.value.shape() {
                return Err(OptErr::ShapeMismatch {
                    what: "gradient",
                    group: None,
                    param: None,
                    got: grad.shape().to_vec(),
                    expected: self.value.shape().to_vec(),
                });
            }
        }

        self.grad = grad;
        Ok(())
    }

    /// Removes and returns the gradient of this parameter.
    pub fn take_grad(&mut self) -> Option<ArrayD<f32>> {
        self.grad.take()
    }

    /// Returns a copy of this parameter's values without its gradient.
    pub fn value_copy(&self) -> Self {
        Self::new(self.value.clone())
    }
}
