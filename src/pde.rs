/// geometry of a 1D domain: bounds and coordinate system
pub mod geometry;
/// uniform cell-centred submeshes and the mesh map over all domains
pub mod mesh;
/// the symbolic model layer: variables, equations, boundary and initial
/// conditions, with validation before discretisation
///# Example
/// ```
/// use RustedPDE::pde::model::{BoundaryCondition, PdeEquation, PdeModel, Variable};
/// use RustedPDE::symbolic::symbolic_engine::Expr;
/// let mut model = PdeModel::new("spherical diffusion");
/// model.add_variable(Variable::new("c", "negative particle")).unwrap();
/// model.set_equation("c", PdeEquation { diffusivity: Expr::Const(1.0), source: None }).unwrap();
/// model.set_boundary_conditions(
///     "c",
///     BoundaryCondition::Neumann(Expr::Const(0.0)),
///     BoundaryCondition::Dirichlet(Expr::Const(2.0)),
/// ).unwrap();
/// model.set_initial_condition("c", Expr::Const(1.0)).unwrap();
/// assert!(model.validate().is_ok());
/// ```
pub mod model;
/// finite volume stencils: gradient and divergence matrices and the
/// combined div(D grad .) operator with boundary conditions folded in
pub mod finite_volume;
/// turns a validated model plus a mesh into an ODE system in time
pub mod discretise;
