//! Time integration facade for discretised models. A `PdeSolver` wraps a
//! `DiscretisedSystem`, generates the rhs and Jacobian closures from its
//! indexed symbolic equations, then drives one of the steppers to `t_bound`
//! through a status-string loop ("running" / "finished" / "failed").
//!
//! Methods are chosen by name: "RK45" and "DOPRI" are explicit fixed-step
//! steppers, "BE" is backward Euler with an analytic-Jacobian Newton solve.
//! An unrecognised name is reported as `PdeError::UnknownOption` rather
//! than a panic.

use crate::Utils::plots::{plot_profile, plots};
use crate::numerical::BE::BE;
use crate::numerical::NonStiff_api::{DormandPrince, RK45};
use crate::pde::discretise::DiscretisedSystem;
use crate::pde::model::PdeError;
use crate::symbolic::symbolic_functions::Jacobian;
use csv::Writer;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Method {
    RK45,
    DOPRI,
    BE,
}

pub enum Solvers {
    BE(BE),
    RK45(RK45),
    DOPRI(DormandPrince),
}

impl Solvers {
    pub fn new(method: Method) -> Solvers {
        match method {
            Method::BE => Solvers::BE(BE::new()),
            Method::RK45 => Solvers::RK45(RK45::new()),
            Method::DOPRI => Solvers::DOPRI(DormandPrince::new()),
        }
    }
}

trait Solver {
    fn step(&mut self, t_bound: f64, status: &mut String, message: &mut Option<String>);
}

impl Solver for RK45 {
    fn step(&mut self, t_bound: f64, status: &mut String, _message: &mut Option<String>) {
        if self.t >= t_bound {
            *status = "finished".to_string();
        } else if self._step_impl() {
            *status = "running".to_string();
            if self.t - t_bound >= 0.0 {
                *status = "finished".to_string();
            }
        } else {
            *status = "failed".to_string();
        }
    }
}

impl Solver for DormandPrince {
    fn step(&mut self, t_bound: f64, status: &mut String, _message: &mut Option<String>) {
        if self.t >= t_bound {
            *status = "finished".to_string();
        } else if self._step_impl() {
            *status = "running".to_string();
            if self.t - t_bound >= 0.0 {
                *status = "finished".to_string();
            }
        } else {
            *status = "failed".to_string();
        }
    }
}

impl Solver for BE {
    fn step(&mut self, t_bound: f64, status: &mut String, message: &mut Option<String>) {
        if self.t >= t_bound {
            *status = "finished".to_string();
        } else if self._step_impl() {
            *status = "running".to_string();
            if self.t - t_bound >= 0.0 {
                *status = "finished".to_string();
            }
        } else {
            *message = Some("Newton iteration failed".to_string());
            *status = "failed".to_string();
        }
    }
}

pub struct PdeSolver {
    system: DiscretisedSystem,
    method: Method,
    t0: f64,
    t_bound: f64,
    h_step: f64,
    tolerance: f64,
    max_iterations: usize,
    status: String,
    message: Option<String>,
    solver_instance: Solvers,
    t_result: DVector<f64>,
    y_result: DMatrix<f64>,
}

impl PdeSolver {
    pub fn new(
        system: DiscretisedSystem,
        method: &str,
        t0: f64,
        t_bound: f64,
        h_step: f64,
    ) -> Result<Self, PdeError> {
        let method = Method::from_str(method).map_err(|_| PdeError::UnknownOption {
            option: "method".to_string(),
            value: method.to_string(),
        })?;
        if h_step <= 0.0 || t_bound <= t0 {
            return Err(PdeError::Solver(
                "step size must be positive and t_bound must exceed t0".to_string(),
            ));
        }
        let solver_instance = Solvers::new(method);
        Ok(PdeSolver {
            system,
            method,
            t0,
            t_bound,
            h_step,
            tolerance: 1e-8,
            max_iterations: 50,
            status: "running".to_string(),
            message: None,
            solver_instance,
            t_result: DVector::zeros(1),
            y_result: DMatrix::zeros(1, 1),
        })
    }

    /// Newton settings for the implicit method; ignored by RK45 and DOPRI.
    pub fn set_newton_parameters(&mut self, tolerance: f64, max_iterations: usize) {
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
    }

    /// Lambdify the discretised equations and load the chosen stepper.
    pub fn generate(&mut self) {
        let mut jacobian_instance = Jacobian::new();
        jacobian_instance.generate_IVP_ODEsolver(
            self.system.equations.clone(),
            self.system.values.clone(),
            self.system.arg.clone(),
        );
        let fun = jacobian_instance.lambdified_functions_IVP_DVector;
        let jac = jacobian_instance.function_jacobian_IVP_DMatrix;

        if self.method != Method::BE {
            // diagonal of J sets the fastest decay rate; warn when the fixed
            // step exceeds the explicit stability bound
            let j0 = jac(self.t0, &self.system.y0);
            let max_rate = (0..j0.nrows())
                .map(|i| j0[(i, i)].abs())
                .fold(0.0_f64, f64::max);
            if max_rate > 0.0 && self.h_step > 2.0 / max_rate {
                warn!(
                    "step size {} exceeds the explicit stability estimate {:.3e}; consider BE",
                    self.h_step,
                    2.0 / max_rate
                );
            }
        }

        match self.method {
            Method::RK45 => {
                let mut solver_instance = RK45::new();
                solver_instance.set_initial(fun, self.system.y0.clone(), self.t0, self.h_step);
                self.solver_instance = Solvers::RK45(solver_instance);
            }
            Method::DOPRI => {
                let mut solver_instance = DormandPrince::new();
                solver_instance.set_initial(fun, self.system.y0.clone(), self.t0, self.h_step);
                self.solver_instance = Solvers::DOPRI(solver_instance);
            }
            Method::BE => {
                let mut solver_instance = BE::new();
                solver_instance.set_initial(
                    fun,
                    jac,
                    self.system.y0.clone(),
                    self.t0,
                    self.h_step,
                    self.tolerance,
                    self.max_iterations,
                );
                self.solver_instance = Solvers::BE(solver_instance);
            }
        }
        info!(
            "solver {} generated for {} unknowns, t in [{}, {}], h = {}",
            self.method,
            self.system.n_states,
            self.t0,
            self.t_bound,
            self.h_step
        );
    }

    pub fn main_loop(&mut self) {
        let start = Instant::now();
        let mut integr_status: Option<i8> = None;
        let mut y: Vec<DVector<f64>> = Vec::new();
        let mut t: Vec<f64> = Vec::new();

        t.push(self.t0);
        y.push(self.system.y0.clone());

        while integr_status.is_none() {
            match &mut self.solver_instance {
                Solvers::BE(be) => be.step(self.t_bound, &mut self.status, &mut self.message),
                Solvers::RK45(rk45) => {
                    rk45.step(self.t_bound, &mut self.status, &mut self.message)
                }
                Solvers::DOPRI(dopri) => {
                    dopri.step(self.t_bound, &mut self.status, &mut self.message)
                }
            };

            if self.status == "failed" {
                warn!(
                    "integration failed: {}",
                    self.message.as_deref().unwrap_or("stepper error")
                );
                break;
            }

            let (t_i, y_i) = match &self.solver_instance {
                Solvers::BE(be) => (be.t, be.y.clone()),
                Solvers::RK45(rk45) => (rk45.t, rk45.y.clone()),
                Solvers::DOPRI(dopri) => (dopri.t, dopri.y.clone()),
            };
            if t_i > *t.last().unwrap() {
                t.push(t_i);
                y.push(y_i);
            }

            if self.status == "finished" {
                integr_status = Some(0);
            }
        }

        let rows = y.len();
        let cols = y[0].len();
        let mut flat_vec: Vec<f64> = Vec::new();
        for vector in y.iter() {
            flat_vec.extend(vector.iter());
        }
        let y_res: DMatrix<f64> = DMatrix::from_vec(cols, rows, flat_vec).transpose();
        let t_res = DVector::from_vec(t);
        let duration = start.elapsed();
        info!(
            "integration loop took {} milliseconds, {} steps recorded",
            duration.as_millis(),
            rows
        );

        self.t_result = t_res;
        self.y_result = y_res;
    }

    pub fn solve(&mut self) -> Result<(), PdeError> {
        self.generate();
        self.main_loop();
        if self.status == "failed" {
            return Err(PdeError::Solver(
                self.message
                    .clone()
                    .unwrap_or_else(|| "integration failed".to_string()),
            ));
        }
        Ok(())
    }

    pub fn get_result(&self) -> (DVector<f64>, DMatrix<f64>) {
        (self.t_result.clone(), self.y_result.clone())
    }

    /// Final-time state of a single field, in node order. Requires `solve()`
    /// to have produced results.
    pub fn final_profile(&self, name: &str) -> Result<(DVector<f64>, DVector<f64>), PdeError> {
        if self.y_result.ncols() != self.system.n_states {
            return Err(PdeError::Solver(
                "no results available; run solve() first".to_string(),
            ));
        }
        let field = self.system.field(name)?;
        let last = self.y_result.nrows() - 1;
        let values = DVector::from_iterator(
            field.slice.len,
            (field.slice.start..field.slice.start + field.slice.len)
                .map(|j| self.y_result[(last, j)]),
        );
        Ok((field.nodes.clone(), values))
    }

    pub fn plot_result(&self) {
        plots(
            &self.system.arg,
            &self.system.values,
            &self.t_result,
            &self.y_result,
        );
        info!("time series plotted");
    }

    pub fn plot_profile(&self, name: &str) -> Result<(), PdeError> {
        let (nodes, values) = self.final_profile(name)?;
        plot_profile(name, &nodes, &values);
        info!("final profile of '{}' plotted", name);
        Ok(())
    }

    pub fn save_result(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut wtr = Writer::from_path(Path::new(path))?;
        let mut header: Vec<String> = vec![self.system.arg.clone()];
        header.extend(self.system.values.iter().cloned());
        wtr.write_record(&header)?;
        for (i, row) in self.y_result.row_iter().enumerate() {
            let mut record: Vec<String> = vec![self.t_result[i].to_string()];
            record.extend(row.iter().map(|x| x.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        info!("result saved to {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pde::discretise::Discretisation;
    use crate::pde::geometry::Geometry1D;
    use crate::pde::mesh::Mesh;
    use crate::pde::model::{BoundaryCondition, PdeEquation, PdeModel, Variable};
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn sphere_system(npts: usize) -> DiscretisedSystem {
        let mut model = PdeModel::new("sphere diffusion");
        model
            .add_variable(Variable::new("c", "negative particle"))
            .unwrap();
        model
            .set_equation(
                "c",
                PdeEquation {
                    diffusivity: Expr::Const(1.0),
                    source: None,
                },
            )
            .unwrap();
        model
            .set_boundary_conditions(
                "c",
                BoundaryCondition::Neumann(Expr::Const(0.0)),
                BoundaryCondition::Dirichlet(Expr::Const(2.0)),
            )
            .unwrap();
        model
            .set_initial_condition("c", Expr::Const(1.0))
            .unwrap();
        let geometry = Geometry1D::unit_sphere("negative particle");
        let mut npts_map = HashMap::new();
        npts_map.insert("negative particle".to_string(), npts);
        let mesh = Mesh::new(&[geometry], &npts_map).unwrap();
        let mut disc = Discretisation::new();
        disc.discretise(&model, &mesh).unwrap()
    }

    #[test]
    fn test_unknown_method_rejected() {
        let system = sphere_system(5);
        let err = PdeSolver::new(system, "CrankNicolson", 0.0, 1.0, 0.01)
            .err()
            .unwrap();
        match err {
            PdeError::UnknownOption { option, value } => {
                assert_eq!(option, "method");
                assert_eq!(value, "CrankNicolson");
            }
            other => panic!("expected UnknownOption, got {}", other),
        }
    }

    #[test]
    fn test_profile_before_solve_is_an_error() {
        let system = sphere_system(5);
        let solver = PdeSolver::new(system, "BE", 0.0, 1.0, 0.01).unwrap();
        match solver.final_profile("c") {
            Err(PdeError::Solver(msg)) => assert!(msg.contains("solve"), "got: {}", msg),
            Err(other) => panic!("expected solver error, got {}", other),
            Ok(_) => panic!("expected error before solve"),
        }
        assert!(solver.plot_profile("c").is_err());
    }

    #[test]
    fn test_invalid_time_window_rejected() {
        let system = sphere_system(5);
        assert!(PdeSolver::new(system, "RK45", 1.0, 0.5, 0.01).is_err());
    }

    #[test]
    fn test_sphere_relaxes_to_surface_value_be() {
        // with a fixed surface value and no-flux centre the long-time
        // solution is uniform at the surface value
        let system = sphere_system(10);
        let mut solver = PdeSolver::new(system, "BE", 0.0, 5.0, 0.05).unwrap();
        solver.solve().unwrap();
        let (_nodes, profile) = solver.final_profile("c").unwrap();
        for value in profile.iter() {
            assert_relative_eq!(*value, 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_sphere_relaxes_to_surface_value_rk45() {
        let system = sphere_system(8);
        // explicit method needs a step under the diffusive stability limit
        let mut solver = PdeSolver::new(system, "RK45", 0.0, 3.0, 1e-4).unwrap();
        solver.solve().unwrap();
        let (_nodes, profile) = solver.final_profile("c").unwrap();
        for value in profile.iter() {
            assert_relative_eq!(*value, 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_result_shape_and_monotone_time() {
        let system = sphere_system(6);
        let n_states = system.n_states;
        let mut solver = PdeSolver::new(system, "BE", 0.0, 0.5, 0.05).unwrap();
        solver.solve().unwrap();
        let (t, y) = solver.get_result();
        assert_eq!(y.ncols(), n_states);
        assert_eq!(y.nrows(), t.len());
        assert_relative_eq!(t[0], 0.0);
        for i in 1..t.len() {
            assert!(t[i] > t[i - 1]);
        }
        assert!(*t.iter().last().unwrap() >= 0.5);
    }

    #[test]
    fn test_solution_bounded_by_extremes() {
        // maximum principle: values stay between the initial value and
        // the surface value
        let system = sphere_system(10);
        let mut solver = PdeSolver::new(system, "BE", 0.0, 1.0, 0.02).unwrap();
        solver.solve().unwrap();
        let (_t, y) = solver.get_result();
        for value in y.iter() {
            assert!(*value >= 1.0 - 1e-8 && *value <= 2.0 + 1e-8);
        }
    }

    #[test]
    fn test_save_result_writes_csv() {
        let system = sphere_system(4);
        let mut solver = PdeSolver::new(system, "BE", 0.0, 0.2, 0.05).unwrap();
        solver.solve().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        solver.save_result(path.to_str().unwrap()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("t,c0,c1"));
        assert!(lines.count() >= 2);
    }
}
