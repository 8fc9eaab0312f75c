#![allow(non_snake_case)]
use RustedPDE::Utils::logger::init_console_logger;
use RustedPDE::numerical::ODE_api::PdeSolver;
use RustedPDE::pde::discretise::Discretisation;
use RustedPDE::pde::geometry::Geometry1D;
use RustedPDE::pde::mesh::Mesh;
use RustedPDE::pde::model::{BoundaryCondition, PdeEquation, PdeModel, Variable};
use RustedPDE::symbolic::symbolic_engine::Expr;
use simplelog::LevelFilter;
use std::collections::HashMap;

// Diffusion of a concentration c inside a unit sphere: fixed value at the
// surface, zero flux through the centre, uniform initial state.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_console_logger(LevelFilter::Info);

    let mut model = PdeModel::new("spherical diffusion");
    model.add_variable(Variable::new("c", "negative particle"))?;
    model.set_equation(
        "c",
        PdeEquation {
            diffusivity: Expr::Const(1.0),
            source: None,
        },
    )?;
    model.set_boundary_conditions(
        "c",
        BoundaryCondition::Neumann(Expr::Const(0.0)),
        BoundaryCondition::Dirichlet(Expr::Const(2.0)),
    )?;
    model.set_initial_condition("c", Expr::Const(1.0))?;

    let geometry = Geometry1D::unit_sphere("negative particle");
    let mut npts = HashMap::new();
    npts.insert("negative particle".to_string(), 20usize);
    let mesh = Mesh::new(&[geometry], &npts)?;

    let system = Discretisation::new().discretise(&model, &mesh)?;
    println!(
        "discretised system: {} unknowns {:?}",
        system.n_states,
        system.values.first()
    );

    let mut solver = PdeSolver::new(system, "BE", 0.0, 1.0, 0.01)?;
    solver.solve()?;

    let (t, y) = solver.get_result();
    println!(
        "integrated to t = {}, centre value {:.6}, surface value {:.6}",
        t[t.len() - 1],
        y[(y.nrows() - 1, 0)],
        y[(y.nrows() - 1, y.ncols() - 1)]
    );

    solver.plot_profile("c")?;
    solver.save_result("c_result.csv")?;
    println!("profile plotted and result saved");
    Ok(())
}
