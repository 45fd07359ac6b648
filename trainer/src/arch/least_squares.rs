use katyusha::params::{Param, ParamGroup, ParamSet};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Ix1, Ix2};

use super::Objective;
use crate::{Result, TrainErr, dataset::Dataset};

/// Least squares regression with a linear model `y = W x + b`.
///
/// The loss of a sample is `0.5 * |W x + b - y|^2`. The parameters are a single group with the
/// weights, shaped `[y_size, x_size]`, followed by the biases, shaped `[y_size]`.
#[derive(Debug)]
pub struct LeastSquares {
    dataset: Dataset,
    layout: ParamSet,
}

impl LeastSquares {
    /// Creates a new `LeastSquares` objective.
    ///
    /// # Arguments
    /// * `dataset` - The samples to fit.
    pub fn new(dataset: Dataset) -> Self {
        let layout = ParamSet::new(vec![ParamGroup::new(vec![
            Param::zeros(&[dataset.y_size(), dataset.x_size()]),
            Param::zeros(&[dataset.y_size()]),
        ])]);

        Self { dataset, layout }
    }

    fn views<'a>(
        &self,
        params: &'a ParamSet,
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        self.layout.check_layout(params, "least squares parameters")?;

        let [w, b] = params.groups()[0].params() else {
            unreachable!("the layout was checked to have a single group of two parameters");
        };

        let w = w.value().view().into_dimensionality::<Ix2>()?;
        let b = b.value().view().into_dimensionality::<Ix1>()?;
        Ok((w, b))
    }

    fn residual(
        &self,
        w: ArrayView2<f32>,
        b: ArrayView1<f32>,
        index: usize,
    ) -> Result<(ArrayView1<'_, f32>, Array1<f32>)> {
        let (x, y) = self.dataset.sample(index)?;
        let r = w.dot(&x) + b - y;
        Ok((x, r))
    }
}

impl Objective for LeastSquares {
    fn num_samples(&self) -> usize {
        self.dataset.len()
    }

    fn init_params(&self) -> ParamSet {
        self.layout.clone()
    }

    fn gradient(&self, params: &mut ParamSet, batch: &[usize]) -> Result<()> {
        if batch.is_empty() {
            return Err(TrainErr::EmptyBatch);
        }

        let (w, b) = self.views(params)?;
        let mut grad_w = Array2::<f32>::zeros(w.raw_dim());
        let mut grad_b = Array1::<f32>::zeros(b.raw_dim());

        for &index in batch {
            let (x, r) = self.residual(w, b, index)?;

            for (mut row, &ri) in grad_w.rows_mut().into_iter().zip(&r) {
                row.scaled_add(ri, &x);
            }

            grad_b += &r;
        }

        let scale = 1. / batch.len() as f32;
        grad_w *= scale;
        grad_b *= scale;

        let [w, b] = params.groups_mut()[0].params_mut() else {
            unreachable!("the layout was checked to have a single group of two parameters");
        };

        w.set_grad(Some(grad_w.into_dyn()))?;
        b.set_grad(Some(grad_b.into_dyn()))?;
        Ok(())
    }

    fn loss(&self, params: &ParamSet, batch: &[usize]) -> Result<f32> {
        if batch.is_empty() {
            return Err(TrainErr::EmptyBatch);
        }

        let (w, b) = self.views(params)?;
        let mut total = 0.;

        for &index in batch {
            let (_, r) = self.residual(w, b, index)?;
            total += 0.5 * r.dot(&r);
        }

        Ok(total / batch.len() as f32)
    }
}
