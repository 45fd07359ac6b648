use std::num::NonZeroUsize;

use log::{debug, trace, warn};
use ndarray::Zip;

use crate::{OptErr, Result, params::ParamSet};

/// The fixed weight of the snapshot point when forming `x_k`.
pub const TAU_2: f32 = 0.5;

/// The Lipschitz constant used when none is configured.
pub const DEFAULT_LIPS: f32 = 10.;

/// The amount of inner iterations per epoch used when none is configured.
pub const DEFAULT_M: usize = 500;

/// The parallel parameter sets the inner loop works on, allocated on the first snapshot.
#[derive(Debug, Clone)]
struct Iterates {
    /// The point where the next minibatch gradient is evaluated.
    x_k: ParamSet,
    /// The output iterate.
    y_k: ParamSet,
    /// The momentum iterate.
    z_k: ParamSet,
    /// The snapshot point, carrying the full batch gradient.
    x_tilde: ParamSet,
    /// The running mean of `y_k` over the current epoch.
    avg_y: ParamSet,
}

/// The inner loop of the Katyusha accelerated variance reduced optimization algorithm.
///
/// Once per epoch the driver hands in a snapshot point with its full batch gradient through
/// `set_outparam`, then performs `m` inner iterations, each one being:
///
/// 1. `compute_xk` to form the next evaluation point.
/// 2. Copying `current_iterate` into the live model and evaluating a minibatch gradient there,
///    which is handed back through `load_grads`.
/// 3. Evaluating the same minibatch's gradient at `snapshot_point` and passing it to `step`.
///
/// After the `m`-th step `get_param_groups` yields the average of the epoch's output iterates,
/// which becomes the next snapshot point.
///
/// Every parameter set the optimizer owns is independent storage, the values handed in are
/// always copied.
#[derive(Debug, Clone)]
pub struct Katyusha {
    lips: f32,
    m: NonZeroUsize,

    counter: usize,
    tau_1: f32,
    alpha: f32,
    steps: usize,

    iterates: Option<Iterates>,
}

impl Katyusha {
    /// Creates a new `Katyusha` optimizer.
    ///
    /// # Arguments
    /// * `lips` - The Lipschitz constant of the objective's gradient, must be positive and finite.
    /// * `m` - The amount of inner iterations per epoch, must be positive.
    ///
    /// # Returns
    /// An `InvalidArgument` error if any of the arguments is out of its domain.
    pub fn new(lips: f32, m: usize) -> Result<Self> {
        if !lips.is_finite() || lips <= 0. {
            return Err(OptErr::InvalidArgument(format!(
                "invalid lipschitz constant: {lips}"
            )));
        }

        let m = NonZeroUsize::new(m).ok_or_else(|| {
            OptErr::InvalidArgument(format!("invalid amount of inner iterations: {m}"))
        })?;

        Ok(Self {
            lips,
            m,
            counter: 0,
            tau_1: 0.,
            alpha: 0.,
            steps: 0,
            iterates: None,
        })
    }

    pub fn lips(&self) -> f32 {
        self.lips
    }

    pub fn m(&self) -> usize {
        self.m.get()
    }

    /// The amount of snapshot points received so far.
    pub fn epoch(&self) -> usize {
        self.counter
    }

    /// The amount of steps taken since the last snapshot point.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// The weight of the momentum iterate for the current epoch, zero before the first snapshot.
    pub fn tau_1(&self) -> f32 {
        self.tau_1
    }

    pub fn tau_2(&self) -> f32 {
        TAU_2
    }

    /// The step size of the momentum iterate for the current epoch, zero before the first
    /// snapshot.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Starts a new epoch around a new snapshot point.
    ///
    /// The first call allocates the iterates as copies of `snapshot`'s values, every call
    /// replaces the snapshot point (values and gradients) and resets the running average to
    /// zero.
    ///
    /// # Arguments
    /// * `snapshot` - The snapshot point, every parameter must carry the full batch gradient.
    ///
    /// # Returns
    /// A `MissingGradient` error if any parameter has no gradient or a `ShapeMismatch` if the
    /// layout differs from the previous snapshot's. The optimizer is left untouched on error.
    pub fn set_outparam(&mut self, snapshot: &ParamSet) -> Result<()> {
        snapshot.require_grads()?;

        if let Some(iterates) = &self.iterates {
            iterates.x_tilde.check_layout(snapshot, "snapshot")?;
        }

        self.tau_1 = 2. / (self.counter as f32 + 4.);
        self.counter += 1;
        self.alpha = 1. / (3. * self.tau_1 * self.lips);
        self.steps = 0;

        match &mut self.iterates {
            Some(iterates) => {
                iterates.x_tilde.copy_values_from(snapshot)?;
                iterates.x_tilde.copy_grads_from(snapshot)?;
                iterates.avg_y.zero_values();
            }
            None => {
                let values = snapshot.value_copy();
                let mut avg_y = values.clone();
                avg_y.zero_values();

                self.iterates = Some(Iterates {
                    x_k: values.clone(),
                    y_k: values.clone(),
                    z_k: values,
                    x_tilde: snapshot.clone(),
                    avg_y,
                });
            }
        }

        debug!(epoch = self.counter, tau_1 = self.tau_1, alpha = self.alpha; "new snapshot point");
        Ok(())
    }

    /// Computes the next evaluation point as
    /// `x_k = tau_1 * z_k + tau_2 * x_tilde + (1 - tau_1 - tau_2) * y_k`.
    pub fn compute_xk(&mut self) -> Result<()> {
        let tau_1 = self.tau_1;
        let w_y = 1. - tau_1 - TAU_2;

        let Iterates {
            x_k,
            y_k,
            z_k,
            x_tilde,
            ..
        } = self.iterates.as_mut().ok_or(OptErr::NotInitialized)?;

        let params = x_k
            .params_mut()
            .zip(z_k.params())
            .zip(x_tilde.params())
            .zip(y_k.params());

        for ((((_, x), (_, z)), (_, xt)), (_, y)) in params {
            Zip::from(x.value_mut())
                .and(z.value())
                .and(xt.value())
                .and(y.value())
                .for_each(|x, &z, &xt, &y| *x = tau_1 * z + TAU_2 * xt + w_y * y);
        }

        Ok(())
    }

    /// Stores the minibatch gradient evaluated at `x_k` on the optimizer's own iterate.
    ///
    /// # Arguments
    /// * `grads` - A set laid out as the iterates, a parameter without a gradient leaves the
    ///   corresponding position without one, which makes the next `step` skip it.
    pub fn load_grads(&mut self, grads: &ParamSet) -> Result<()> {
        let iterates = self.iterates.as_mut().ok_or(OptErr::NotInitialized)?;
        iterates.x_k.copy_grads_from(grads)
    }

    /// Performs a single inner iteration.
    ///
    /// With `d = grad(x_k) - minibatch_grad(x_tilde) + full_grad(x_tilde)`:
    ///
    /// * `y_k = x_k - d / (3 * lips)`
    /// * `z_k = z_k - alpha * d`
    /// * `avg_y = avg_y + y_k / m`
    ///
    /// A parameter is skipped entirely, leaving its `y_k`, `z_k` and `avg_y` untouched, if either
    /// the gradient loaded at `x_k` or the one in `xtilde_grads` is missing.
    ///
    /// # Arguments
    /// * `xtilde_grads` - The minibatch gradient evaluated at the snapshot point, using the same
    ///   minibatch as the one loaded at `x_k`.
    pub fn step(&mut self, xtilde_grads: &ParamSet) -> Result<()> {
        let y_scale = 1. / (3. * self.lips);
        let alpha = self.alpha;
        let inv_m = 1. / self.m.get() as f32;

        let Iterates {
            x_k,
            y_k,
            z_k,
            x_tilde,
            avg_y,
        } = self.iterates.as_mut().ok_or(OptErr::NotInitialized)?;

        x_tilde.check_layout(xtilde_grads, "snapshot minibatch gradients")?;

        let params = x_k
            .params()
            .zip(x_tilde.params())
            .zip(xtilde_grads.params())
            .zip(y_k.params_mut())
            .zip(z_k.params_mut())
            .zip(avg_y.params_mut());

        for ((((((pos, x), (_, xt)), (_, q)), (_, y)), (_, z)), (_, avg)) in params {
            let (Some(grad), Some(mb_grad), Some(full_grad)) = (x.grad(), q.grad(), xt.grad())
            else {
                trace!(group = pos.0, param = pos.1; "missing gradient, skipping parameter");
                continue;
            };

            let d = &(grad - mb_grad) + full_grad;

            Zip::from(y.value_mut())
                .and(z.value_mut())
                .and(avg.value_mut())
                .and(x.value())
                .and(&d)
                .for_each(|y, z, avg, &x, &d| {
                    *y = x - y_scale * d;
                    *z -= alpha * d;
                    *avg += inv_m * *y;
                });
        }

        self.steps += 1;
        Ok(())
    }

    /// Returns the running average of the output iterates, meant to be read after exactly `m`
    /// steps and used as the next snapshot point.
    pub fn get_param_groups(&self) -> Result<&ParamSet> {
        let iterates = self.iterates.as_ref().ok_or(OptErr::NotInitialized)?;

        if self.steps != self.m.get() {
            warn!(
                "reading the average after {} steps of the expected {}, it is biased",
                self.steps, self.m
            );
        }

        Ok(&iterates.avg_y)
    }

    /// The point the next minibatch gradient must be evaluated at.
    pub fn current_iterate(&self) -> Result<&ParamSet> {
        self.iterates
            .as_ref()
            .map(|it| &it.x_k)
            .ok_or(OptErr::NotInitialized)
    }

    pub fn output_iterate(&self) -> Result<&ParamSet> {
        self.iterates
            .as_ref()
            .map(|it| &it.y_k)
            .ok_or(OptErr::NotInitialized)
    }

    pub fn momentum_iterate(&self) -> Result<&ParamSet> {
        self.iterates
            .as_ref()
            .map(|it| &it.z_k)
            .ok_or(OptErr::NotInitialized)
    }

    /// The current snapshot point and its full batch gradient.
    pub fn snapshot_point(&self) -> Result<&ParamSet> {
        self.iterates
            .as_ref()
            .map(|it| &it.x_tilde)
            .ok_or(OptErr::NotInitialized)
    }
}
