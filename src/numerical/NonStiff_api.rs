//! Explicit fixed-step Runge-Kutta steppers for the semi-discrete systems
//! produced by the discretiser. Both steppers expose the same minimal
//! surface: `set_initial` to load the rhs closure and state, `_step_impl`
//! to advance one step. The `PdeSolver` facade drives them through the
//! status-string protocol in `ODE_api`.

use log::warn;
use nalgebra::DVector;

/// Runge-Kutta-Fehlberg 4(5) stepper, fixed step.
pub struct RK45 {
    f: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
    pub t: f64,
    pub y: DVector<f64>,
    h: f64,
}

impl RK45 {
    pub fn new() -> RK45 {
        RK45 {
            f: Box::new(|_t, y| {
                let mut dydt = DVector::zeros(y.len());
                dydt[0] = y[1];
                dydt[1] = -y[0];
                dydt
            }),
            t: 0.0,
            y: DVector::from_vec(vec![1.0, 0.0]),
            h: 0.1,
        }
    }

    pub fn set_initial(
        &mut self,
        f: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
        y0: DVector<f64>,
        t0: f64,
        h: f64,
    ) {
        self.f = f;
        self.y = y0;
        self.t = t0;
        self.h = h;
    }

    pub fn _step_impl(&mut self) -> bool {
        // Butcher tableau for RKF45
        let a: [[f64; 5]; 5] = [
            [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],
            [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
            [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
            [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
            [
                -8.0 / 27.0,
                2.0,
                -3544.0 / 2565.0,
                1859.0 / 4104.0,
                -11.0 / 40.0,
            ],
        ];
        let c = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];
        let b = [
            16.0 / 135.0,
            0.0,
            6656.0 / 12825.0,
            28561.0 / 56430.0,
            -9.0 / 50.0,
            2.0 / 55.0,
        ];

        let t = self.t;
        let y = &self.y;
        let f = &self.f;
        let h = self.h;

        let mut k = vec![DVector::zeros(y.len()); 6];
        k[0] = h * f(t, y);
        for i in 1..6 {
            let mut y_temp = y.clone();
            for j in 0..i {
                y_temp += a[i - 1][j] * &k[j];
            }
            k[i] = h * f(t + c[i] * h, &y_temp);
        }

        let mut y_next = y.clone();
        for i in 0..6 {
            y_next += b[i] * &k[i];
        }

        if y_next.iter().any(|v| !v.is_finite()) {
            warn!("RK45 produced non-finite state at t = {}", t);
            return false;
        }
        self.t = t + h;
        self.y = y_next;
        true
    }
}

impl Default for RK45 {
    fn default() -> Self {
        Self::new()
    }
}

/// Dormand-Prince 5(4) stepper, fixed step.
pub struct DormandPrince {
    pub f: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
    pub t: f64,
    pub y: DVector<f64>,
    h: f64,
}

impl DormandPrince {
    pub fn new() -> DormandPrince {
        DormandPrince {
            f: Box::new(|_t, y| {
                let mut dydt = DVector::zeros(y.len());
                dydt[0] = y[1];
                dydt[1] = -y[0];
                dydt
            }),
            t: 0.0,
            y: DVector::from_vec(vec![1.0, 0.0]),
            h: 0.1,
        }
    }

    pub fn set_initial(
        &mut self,
        f: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
        y0: DVector<f64>,
        t0: f64,
        h: f64,
    ) {
        self.f = f;
        self.y = y0;
        self.t = t0;
        self.h = h;
    }

    pub fn _step_impl(&mut self) -> bool {
        let a: [[f64; 6]; 6] = [
            [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
            [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
            [
                19372.0 / 6561.0,
                -25360.0 / 2187.0,
                64448.0 / 6561.0,
                -212.0 / 729.0,
                0.0,
                0.0,
            ],
            [
                9017.0 / 3168.0,
                -355.0 / 33.0,
                46732.0 / 5247.0,
                49.0 / 176.0,
                -5103.0 / 18656.0,
                0.0,
            ],
            [
                35.0 / 384.0,
                0.0,
                500.0 / 1113.0,
                125.0 / 192.0,
                -2187.0 / 6784.0,
                11.0 / 84.0,
            ],
        ];
        let c = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
        let b = [
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
            0.0,
        ];

        let t = self.t;
        let y = &self.y;
        let f = &self.f;
        let h = self.h;

        let mut k = vec![DVector::zeros(y.len()); 7];
        k[0] = h * f(t, y);
        for i in 1..7 {
            let mut y_temp = y.clone();
            for j in 0..i {
                y_temp += a[i - 1][j] * &k[j];
            }
            k[i] = h * f(t + c[i] * h, &y_temp);
        }

        let mut y_next = y.clone();
        for i in 0..7 {
            y_next += b[i] * &k[i];
        }

        if y_next.iter().any(|v| !v.is_finite()) {
            warn!("DOPRI produced non-finite state at t = {}", t);
            return false;
        }
        self.t = t + h;
        self.y = y_next;
        true
    }
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decay_rhs() -> Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>> {
        Box::new(|_t, y| -y.clone())
    }

    #[test]
    fn test_rk45_exponential_decay() {
        let mut solver = RK45::new();
        solver.set_initial(decay_rhs(), DVector::from_vec(vec![1.0]), 0.0, 0.01);
        while solver.t < 1.0 {
            assert!(solver._step_impl());
        }
        assert_relative_eq!(solver.y[0], (-solver.t).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_dopri_exponential_decay() {
        let mut solver = DormandPrince::new();
        solver.set_initial(decay_rhs(), DVector::from_vec(vec![1.0]), 0.0, 0.01);
        while solver.t < 1.0 {
            assert!(solver._step_impl());
        }
        assert_relative_eq!(solver.y[0], (-solver.t).exp(), epsilon = 1e-7);
    }

    #[test]
    fn test_rk45_harmonic_oscillator_default_rhs() {
        // default rhs is the harmonic oscillator; energy should be conserved
        // to truncation order over a short run
        let mut solver = RK45::new();
        let y0 = solver.y.clone();
        let h = 0.01;
        solver.set_initial(
            Box::new(|_t, y| DVector::from_vec(vec![y[1], -y[0]])),
            y0,
            0.0,
            h,
        );
        for _ in 0..100 {
            assert!(solver._step_impl());
        }
        let energy = solver.y[0].powi(2) + solver.y[1].powi(2);
        assert_relative_eq!(energy, 1.0, epsilon = 1e-8);
    }
}
