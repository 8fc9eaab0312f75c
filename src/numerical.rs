/// Backward Euler stepper with analytic-Jacobian Newton iteration, the
/// workhorse for stiff semi-discrete diffusion systems
pub mod BE;
/// explicit fixed-step Runge-Kutta steppers (RKF45 and Dormand-Prince)
pub mod NonStiff_api;
/// general api for time integration of discretised models
/// Example#
/// ```no_run
/// use RustedPDE::numerical::ODE_api::PdeSolver;
/// use RustedPDE::pde::discretise::Discretisation;
/// use RustedPDE::pde::geometry::Geometry1D;
/// use RustedPDE::pde::mesh::Mesh;
/// use RustedPDE::pde::model::{BoundaryCondition, PdeEquation, PdeModel, Variable};
/// use RustedPDE::symbolic::symbolic_engine::Expr;
/// use std::collections::HashMap;
///
/// let mut model = PdeModel::new("spherical diffusion");
/// model.add_variable(Variable::new("c", "negative particle")).unwrap();
/// model.set_equation("c", PdeEquation { diffusivity: Expr::Const(1.0), source: None }).unwrap();
/// model.set_boundary_conditions(
///     "c",
///     BoundaryCondition::Neumann(Expr::Const(0.0)),
///     BoundaryCondition::Dirichlet(Expr::Const(2.0)),
/// ).unwrap();
/// model.set_initial_condition("c", Expr::Const(1.0)).unwrap();
///
/// let geometry = Geometry1D::unit_sphere("negative particle");
/// let mut npts = HashMap::new();
/// npts.insert("negative particle".to_string(), 20usize);
/// let mesh = Mesh::new(&[geometry], &npts).unwrap();
///
/// let system = Discretisation::new().discretise(&model, &mesh).unwrap();
/// let mut solver = PdeSolver::new(system, "BE", 0.0, 1.0, 0.01).unwrap();
/// solver.solve().unwrap();
/// solver.plot_profile("c").unwrap();
/// solver.save_result("c_result.csv").unwrap();
/// ```
pub mod ODE_api;
