//! # Discretisation Pass
//!
//! Converts a validated `PdeModel` plus a `Mesh` into a `DiscretisedSystem`:
//! every field gets a contiguous slice of the global state vector, its
//! `div(D grad .)` operator is assembled by the finite volume method, and the
//! complete right-hand side is emitted as a vector of symbolic expressions
//! over indexed per-node variables (c0, c1, ...). That symbolic form feeds
//! straight into `Jacobian::generate_IVP_ODEsolver`, so implicit solvers get
//! an analytic jacobian for free.
//!
//! A `Discretisation` instance is single-shot: discretising twice is an
//! error, so a half-mutated model can never be rebuilt silently.

use crate::pde::finite_volume::{DivGradOperator, FiniteVolume};
use crate::pde::mesh::Mesh;
use crate::pde::model::{PdeError, PdeModel};
use crate::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::DVector;

/// Contiguous slice of the global state vector owned by one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSlice {
    pub start: usize,
    pub len: usize,
}

/// One field after discretisation.
pub struct DiscretisedField {
    pub name: String,
    pub domain: String,
    pub slice: StateSlice,
    /// assembled `dc/dt = matrix * c + bc_vector` operator of the linear part
    pub operator: DivGradOperator,
    /// node positions the slice components live at
    pub nodes: DVector<f64>,
}

/// The semi-discrete ODE system `dy/dt = f(t, y)`.
pub struct DiscretisedSystem {
    /// rhs expressions, one per state component, in state order
    pub equations: Vec<Expr>,
    /// indexed state variable names, in state order
    pub values: Vec<String>,
    /// time variable name
    pub arg: String,
    /// initial condition evaluated on the mesh
    pub y0: DVector<f64>,
    pub fields: Vec<DiscretisedField>,
    pub n_states: usize,
}

impl DiscretisedSystem {
    pub fn field(&self, name: &str) -> Result<&DiscretisedField, PdeError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| PdeError::Discretisation(format!("no discretised field '{}'", name)))
    }
}

/// The discretisation pass itself.
pub struct Discretisation {
    discretised: bool,
}

impl Discretisation {
    pub fn new() -> Self {
        Discretisation { discretised: false }
    }

    /// Runs the pass. Errors if called twice on the same instance.
    pub fn discretise(
        &mut self,
        model: &PdeModel,
        mesh: &Mesh,
    ) -> Result<DiscretisedSystem, PdeError> {
        if self.discretised {
            return Err(PdeError::Discretisation(format!(
                "model '{}' already discretised",
                model.name
            )));
        }
        model.validate()?;

        let mut equations: Vec<Expr> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        let mut y0_entries: Vec<f64> = Vec::new();
        let mut fields: Vec<DiscretisedField> = Vec::new();
        let mut start = 0usize;

        for var in &model.variables {
            let submesh = mesh.get(&var.domain)?;
            let npts = submesh.npts;
            let equation = &model.equations[&var.name];
            let (left_bc, right_bc) = &model.boundary_conditions[&var.name];

            let operator = FiniteVolume::divgrad_operator(
                submesh,
                &equation.diffusivity,
                &model.spatial_var,
                left_bc,
                right_bc,
            )?;

            // per-node unknown names for this field
            let (_exprs, names) = Expr::IndexedVars(npts, &var.name);

            // expand matrix rows into symbolic expressions
            let mut row_exprs: Vec<Expr> =
                operator.bc_vector.iter().map(|b| Expr::Const(*b)).collect();
            for (i, j, val) in operator.matrix.triplet_iter() {
                row_exprs[i] += Expr::Const(*val) * Expr::IndexedVar(j, &var.name);
            }

            // source term: spatial variable pinned to the node position, the
            // unknown renamed to its per-node name, time left symbolic
            if let Some(source) = &equation.source {
                for i in 0..npts {
                    let node_source = source
                        .set_variable(&model.spatial_var, submesh.nodes[i])
                        .rename_variable(&var.name, &names[i]);
                    row_exprs[i] += node_source;
                }
            }
            for expr in row_exprs {
                equations.push(expr.simplify_());
            }
            values.extend(names);

            // initial condition on node positions
            let ic = &model.initial_conditions[&var.name];
            for i in 0..npts {
                let value = match ic.set_variable(&model.spatial_var, submesh.nodes[i]).simplify_()
                {
                    Expr::Const(v) => v,
                    other => {
                        return Err(PdeError::Discretisation(format!(
                            "initial condition for '{}' does not reduce to a constant: {}",
                            var.name, other
                        )));
                    }
                };
                y0_entries.push(value);
            }

            fields.push(DiscretisedField {
                name: var.name.clone(),
                domain: var.domain.clone(),
                slice: StateSlice { start, len: npts },
                operator,
                nodes: submesh.nodes.clone(),
            });
            start += npts;
        }

        self.discretised = true;
        let n_states = start;
        info!(
            "discretised model '{}': {} fields, {} states",
            model.name,
            fields.len(),
            n_states
        );
        Ok(DiscretisedSystem {
            equations,
            values,
            arg: model.time_var.clone(),
            y0: DVector::from_vec(y0_entries),
            fields,
            n_states,
        })
    }
}

impl Default for Discretisation {
    fn default() -> Self {
        Self::new()
    }
}
