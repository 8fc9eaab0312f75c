//! Backward Euler stepper with a damped-free Newton iteration. The analytic
//! Jacobian closure generated by `Jacobian::generate_IVP_ODEsolver` makes the
//! Newton matrix I - h*J exact, so the iteration converges quadratically for
//! the stiff semi-discrete diffusion systems this crate produces.

use log::warn;
use nalgebra::{DMatrix, DVector};

pub struct BE {
    fun: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
    jac: Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>,
    pub t: f64,
    pub y: DVector<f64>,
    h: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl BE {
    pub fn new() -> BE {
        BE {
            fun: Box::new(|_t, y| -y.clone()),
            jac: Box::new(|_t, y| DMatrix::from_diagonal(&DVector::from_element(y.len(), -1.0))),
            t: 0.0,
            y: DVector::from_vec(vec![1.0]),
            h: 0.1,
            tolerance: 1e-8,
            max_iterations: 50,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_initial(
        &mut self,
        fun: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
        jac: Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>,
        y0: DVector<f64>,
        t0: f64,
        h: f64,
        tolerance: f64,
        max_iterations: usize,
    ) {
        self.fun = fun;
        self.jac = jac;
        self.y = y0;
        self.t = t0;
        self.h = h;
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
    }

    /// One implicit step: solve y - y_n - h*f(t+h, y) = 0 by Newton with the
    /// previous state as the initial guess.
    pub fn _step_impl(&mut self) -> bool {
        let n = self.y.len();
        let t_new = self.t + self.h;
        let identity = DMatrix::<f64>::identity(n, n);
        let mut y_new = self.y.clone();

        for _iter in 0..self.max_iterations {
            let residual = &y_new - &self.y - self.h * (self.fun)(t_new, &y_new);
            let newton_matrix = &identity - self.h * (self.jac)(t_new, &y_new);
            let delta = match newton_matrix.lu().solve(&residual) {
                Some(delta) => delta,
                None => {
                    warn!("BE: singular Newton matrix at t = {}", t_new);
                    return false;
                }
            };
            y_new -= &delta;
            if delta.norm() < self.tolerance {
                self.t = t_new;
                self.y = y_new;
                return true;
            }
        }
        warn!(
            "BE: Newton iteration did not converge within {} iterations at t = {}",
            self.max_iterations, t_new
        );
        false
    }
}

impl Default for BE {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_be_exponential_decay() {
        let mut solver = BE::new();
        solver.set_initial(
            Box::new(|_t, y| -y.clone()),
            Box::new(|_t, y| {
                DMatrix::from_diagonal(&DVector::from_element(y.len(), -1.0))
            }),
            DVector::from_vec(vec![1.0]),
            0.0,
            0.001,
            1e-10,
            50,
        );
        while solver.t < 1.0 {
            assert!(solver._step_impl());
        }
        // first order accurate, loose tolerance
        assert_relative_eq!(solver.y[0], (-solver.t).exp(), epsilon = 1e-3);
    }

    #[test]
    fn test_be_stable_with_large_step_on_stiff_problem() {
        // y' = -1000 y. An explicit method at h = 0.1 would blow up; backward
        // Euler must stay bounded and decay monotonically.
        let mut solver = BE::new();
        solver.set_initial(
            Box::new(|_t, y| -1000.0 * y),
            Box::new(|_t, y| {
                DMatrix::from_diagonal(&DVector::from_element(y.len(), -1000.0))
            }),
            DVector::from_vec(vec![1.0]),
            0.0,
            0.1,
            1e-10,
            50,
        );
        let mut prev = 1.0;
        for _ in 0..10 {
            assert!(solver._step_impl());
            assert!(solver.y[0] > 0.0);
            assert!(solver.y[0] < prev);
            prev = solver.y[0];
        }
    }

    #[test]
    fn test_be_nonlinear_rhs() {
        // logistic equation y' = y (1 - y), y(0) = 0.1, exact solution known
        let mut solver = BE::new();
        solver.set_initial(
            Box::new(|_t, y| {
                DVector::from_vec(vec![y[0] * (1.0 - y[0])])
            }),
            Box::new(|_t, y| DMatrix::from_vec(1, 1, vec![1.0 - 2.0 * y[0]])),
            DVector::from_vec(vec![0.1]),
            0.0,
            0.001,
            1e-12,
            50,
        );
        while solver.t < 2.0 {
            assert!(solver._step_impl());
        }
        let t = solver.t;
        let exact = 0.1 * t.exp() / (1.0 - 0.1 + 0.1 * t.exp());
        assert_relative_eq!(solver.y[0], exact, epsilon = 1e-3);
    }
}
