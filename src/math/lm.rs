//! Levenberg–Marquardt solver for small nonlinear least squares problems.
//!
//! Each iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
//! ```
//!
//! where `J` is the Jacobian of the *model* and `r = y - f(p)`. A step is kept
//! only if it does not increase the SSE; λ shrinks after a kept step and grows
//! after a rejected one.
//!
//! Numerical notes:
//! - Marquardt's diagonal scaling makes the damping insensitive to parameter
//!   units, which matters here because `C` can be many orders of magnitude
//!   away from `k`.
//! - Convergence tests only fire while λ is small; a tiny step taken under
//!   heavy damping says nothing about being near a minimum.

use nalgebra::{DMatrix, DVector};

const MIN_LAMBDA: f64 = 1e-12;
const MAX_LAMBDA: f64 = 1e16;

/// A nonlinear least squares problem.
pub trait LeastSquaresProblem {
    /// Residuals `y_i - f(x_i; p)`.
    ///
    /// Returns `None` when the model cannot be evaluated at `params`.
    fn residuals(&self, params: &DVector<f64>) -> Option<DVector<f64>>;

    /// Jacobian of the model `∂f(x_i; p) / ∂p_j` (rows = observations).
    fn jacobian(&self, params: &DVector<f64>) -> Option<DMatrix<f64>>;
}

#[derive(Debug, Clone)]
pub struct LmSettings {
    pub max_evaluations: usize,
    /// Relative step tolerance.
    pub xtol: f64,
    /// Relative SSE reduction tolerance.
    pub ftol: f64,
    pub initial_lambda: f64,
}

impl Default for LmSettings {
    fn default() -> Self {
        Self {
            max_evaluations: 600,
            xtol: 1e-10,
            ftol: 1.49e-8,
            initial_lambda: 1e-3,
        }
    }
}

/// Converged solution.
#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: DVector<f64>,
    pub sse: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LmFailure {
    /// The model could not be evaluated at the starting point.
    BadStart,
    /// The evaluation budget ran out.
    Exhausted {
        iterations: usize,
        evaluations: usize,
        last_sse: f64,
    },
}

/// Minimize the SSE of `problem` starting from `start`.
pub fn levenberg_marquardt<P: LeastSquaresProblem>(
    problem: &P,
    start: DVector<f64>,
    settings: &LmSettings,
) -> Result<LmReport, LmFailure> {
    let mut params = start;
    let mut residuals = problem.residuals(&params).ok_or(LmFailure::BadStart)?;
    let mut sse = residuals.norm_squared();
    if !sse.is_finite() {
        return Err(LmFailure::BadStart);
    }

    let mut evaluations = 1usize;
    let mut iterations = 0usize;
    let mut lambda = settings.initial_lambda;

    let done = |params: DVector<f64>, sse: f64, iterations: usize, evaluations: usize| LmReport {
        params,
        sse,
        iterations,
        evaluations,
    };

    loop {
        if sse == 0.0 {
            return Ok(done(params, sse, iterations, evaluations));
        }

        let Some(jac) = problem.jacobian(&params) else {
            return Err(LmFailure::Exhausted {
                iterations,
                evaluations,
                last_sse: sse,
            });
        };
        let jtj = jac.transpose() * &jac;
        let grad = jac.transpose() * &residuals;
        iterations += 1;

        // Inner loop: raise damping until a step does not increase the SSE.
        let (candidate, cand_residuals, cand_sse, step) = loop {
            if lambda > MAX_LAMBDA {
                // No damping level helps: we are at a stationary point.
                return Ok(done(params, sse, iterations, evaluations));
            }
            if evaluations >= settings.max_evaluations {
                return Err(LmFailure::Exhausted {
                    iterations,
                    evaluations,
                    last_sse: sse,
                });
            }

            let mut damped = jtj.clone();
            for i in 0..damped.nrows() {
                damped[(i, i)] += lambda * jtj[(i, i)].max(f64::EPSILON);
            }

            let Some(chol) = damped.cholesky() else {
                lambda *= 10.0;
                continue;
            };
            let step = chol.solve(&grad);
            if !step.iter().all(|v| v.is_finite()) {
                lambda *= 10.0;
                continue;
            }

            let candidate = &params + &step;
            evaluations += 1;
            match problem.residuals(&candidate) {
                Some(r) => {
                    let cand_sse = r.norm_squared();
                    if cand_sse.is_finite() && cand_sse <= sse {
                        break (candidate, r, cand_sse, step);
                    }
                    lambda *= 10.0;
                }
                None => lambda *= 10.0,
            }
        };

        let rel_reduction = (sse - cand_sse) / sse;
        let small_step = step.norm() <= settings.xtol * (params.norm() + settings.xtol);

        params = candidate;
        residuals = cand_residuals;
        sse = cand_sse;
        lambda = (lambda / 10.0).max(MIN_LAMBDA);

        tracing::trace!(iterations, evaluations, sse, lambda, "lm step accepted");

        if lambda < 1.0 && (small_step || rel_reduction <= settings.ftol) {
            return Ok(done(params, sse, iterations, evaluations));
        }
    }
}
