//! # PDE Model Module
//!
//! Declarative description of a diffusion problem before discretisation:
//! which fields exist, on which domain they live, their governing equations
//! `dc/dt = div(D * grad(c)) + s`, boundary conditions and initial
//! conditions. Everything enters symbolically; the discretiser (see
//! `pde::discretise`) turns the model plus a mesh into an ODE system.
//!
//! Validation is strict and errors are values: bad option strings, missing
//! conditions and double discretisation all come back as `PdeError` instead
//! of panics, so a driver can report them.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::HashMap;
use std::fmt;

/// Errors of the PDE pipeline.
#[derive(Debug)]
pub enum PdeError {
    /// geometry definition rejected (bounds, coordinate system)
    Geometry(String),
    /// mesh generation / lookup failure
    Mesh(String),
    /// model structure invalid (missing equation, BC, IC, duplicate variable)
    Model(String),
    /// unrecognized option string (solver method, coordinate system, ...)
    UnknownOption { option: String, value: String },
    /// discretisation pass failure (incl. "already discretised")
    Discretisation(String),
    /// time integration failure
    Solver(String),
}

impl fmt::Display for PdeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PdeError::Geometry(msg) => write!(f, "geometry error: {}", msg),
            PdeError::Mesh(msg) => write!(f, "mesh error: {}", msg),
            PdeError::Model(msg) => write!(f, "model error: {}", msg),
            PdeError::UnknownOption { option, value } => {
                write!(f, "unknown value '{}' for option '{}'", value, option)
            }
            PdeError::Discretisation(msg) => write!(f, "discretisation error: {}", msg),
            PdeError::Solver(msg) => write!(f, "solver error: {}", msg),
        }
    }
}

impl std::error::Error for PdeError {}

/// A named unknown field tagged with the domain it lives on.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub domain: String,
}

impl Variable {
    pub fn new(name: &str, domain: &str) -> Self {
        Variable {
            name: name.to_string(),
            domain: domain.to_string(),
        }
    }
}

/// Boundary condition at one end of the domain. Conditions are given in
/// pairs, left end first.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryCondition {
    /// fixed value of the field at the boundary
    Dirichlet(Expr),
    /// fixed gradient (flux / -D) of the field at the boundary;
    /// `Neumann(Const(0.0))` is the no-flux condition
    Neumann(Expr),
}

/// Governing equation of one field: `dc/dt = div(D * grad(c)) + source`.
#[derive(Debug, Clone)]
pub struct PdeEquation {
    /// diffusivity D; may depend on the spatial variable only, so the
    /// discretised div-grad operator stays a constant matrix
    pub diffusivity: Expr,
    /// optional source term; may depend on time, the spatial variable and
    /// the unknown itself
    pub source: Option<Expr>,
}

/// A symbolic diffusion model: variables, equations, boundary and initial
/// conditions. Variable declaration order defines the state vector layout
/// after discretisation.
pub struct PdeModel {
    pub name: String,
    /// time variable name, "t" by default
    pub time_var: String,
    /// spatial variable name, "r" by default
    pub spatial_var: String,
    pub variables: Vec<Variable>,
    pub equations: HashMap<String, PdeEquation>,
    pub boundary_conditions: HashMap<String, (BoundaryCondition, BoundaryCondition)>,
    /// initial condition per variable, an `Expr` of the spatial variable
    pub initial_conditions: HashMap<String, Expr>,
}

impl PdeModel {
    pub fn new(name: &str) -> Self {
        PdeModel {
            name: name.to_string(),
            time_var: "t".to_string(),
            spatial_var: "r".to_string(),
            variables: Vec::new(),
            equations: HashMap::new(),
            boundary_conditions: HashMap::new(),
            initial_conditions: HashMap::new(),
        }
    }

    pub fn add_variable(&mut self, var: Variable) -> Result<(), PdeError> {
        if self.variables.iter().any(|v| v.name == var.name) {
            return Err(PdeError::Model(format!(
                "variable '{}' declared twice",
                var.name
            )));
        }
        self.variables.push(var);
        Ok(())
    }

    /// Sets `d{var}/dt = div(D grad {var}) + source`.
    pub fn set_equation(&mut self, var: &str, equation: PdeEquation) -> Result<(), PdeError> {
        self.check_declared(var)?;
        // diffusivity depending on the unknown would make the operator
        // state-dependent; only the spatial variable is allowed
        for name in equation.diffusivity.all_arguments_are_variables() {
            if name != self.spatial_var {
                return Err(PdeError::Model(format!(
                    "diffusivity for '{}' depends on '{}'; only the spatial variable '{}' is allowed",
                    var, name, self.spatial_var
                )));
            }
        }
        if let Some(source) = &equation.source {
            for name in source.all_arguments_are_variables() {
                if name != self.spatial_var && name != self.time_var && name != var {
                    return Err(PdeError::Model(format!(
                        "source for '{}' depends on undeclared symbol '{}'",
                        var, name
                    )));
                }
            }
        }
        self.equations.insert(var.to_string(), equation);
        Ok(())
    }

    pub fn set_boundary_conditions(
        &mut self,
        var: &str,
        left: BoundaryCondition,
        right: BoundaryCondition,
    ) -> Result<(), PdeError> {
        self.check_declared(var)?;
        self.boundary_conditions
            .insert(var.to_string(), (left, right));
        Ok(())
    }

    pub fn set_initial_condition(&mut self, var: &str, ic: Expr) -> Result<(), PdeError> {
        self.check_declared(var)?;
        for name in ic.all_arguments_are_variables() {
            if name != self.spatial_var {
                return Err(PdeError::Model(format!(
                    "initial condition for '{}' depends on '{}'; only the spatial variable '{}' is allowed",
                    var, name, self.spatial_var
                )));
            }
        }
        self.initial_conditions.insert(var.to_string(), ic);
        Ok(())
    }

    fn check_declared(&self, var: &str) -> Result<(), PdeError> {
        if !self.variables.iter().any(|v| v.name == var) {
            return Err(PdeError::Model(format!(
                "variable '{}' is not declared in model '{}'",
                var, self.name
            )));
        }
        Ok(())
    }

    /// Checks the model is complete: every variable has an equation, boundary
    /// conditions and an initial condition.
    pub fn validate(&self) -> Result<(), PdeError> {
        if self.variables.is_empty() {
            return Err(PdeError::Model(format!(
                "model '{}' has no variables",
                self.name
            )));
        }
        for var in &self.variables {
            if !self.equations.contains_key(&var.name) {
                return Err(PdeError::Model(format!(
                    "variable '{}' has no governing equation",
                    var.name
                )));
            }
            if !self.boundary_conditions.contains_key(&var.name) {
                return Err(PdeError::Model(format!(
                    "variable '{}' has no boundary conditions",
                    var.name
                )));
            }
            if !self.initial_conditions.contains_key(&var.name) {
                return Err(PdeError::Model(format!(
                    "variable '{}' has no initial condition",
                    var.name
                )));
            }
        }
        Ok(())
    }
}
