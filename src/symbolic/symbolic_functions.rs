//! # Symbolic Functions Module
//!
//! Machinery for vectors of symbolic functions: the symbolic jacobian and the
//! lambdified forms consumed by the time integrators. The discretiser hands a
//! `Vec<Expr>` of per-node equations to `Jacobian::generate_IVP_ODEsolver`,
//! which produces
//! - `lambdified_functions_IVP_DVector`: `(t, &DVector) -> DVector`, the rhs
//!   of the semi-discrete system, and
//! - `function_jacobian_IVP_DMatrix`: `(t, &DVector) -> DMatrix`, its analytic
//!   jacobian, used by the implicit backward Euler solver.
//!
//! ```rust, ignore
//! let mut Jacobian_instance = Jacobian::new();
//! Jacobian_instance.generate_IVP_ODEsolver(eq_system, values, arg);
//! let fun = Jacobian_instance.lambdified_functions_IVP_DVector;
//! let jac = Jacobian_instance.function_jacobian_IVP_DMatrix;
//! ```

use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use nalgebra::{DMatrix, DVector};

pub struct Jacobian {
    /// vector of symbolic functions/expressions
    pub vector_of_functions: Vec<Expr>,
    /// vector of symbolic variables
    pub vector_of_variables: Vec<Expr>,
    /// vector of string representation of variables
    pub variable_string: Vec<String>,
    /// time/argument variable name for IVP problems
    pub arg: String,
    /// symbolic jacobian d f_i / d y_j
    pub symbolic_jacobian: Vec<Vec<Expr>>,
    /// human readable jacobian
    pub readable_jacobian: Vec<Vec<String>>,
    pub function_jacobian_IVP_DMatrix: Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>,
    pub lambdified_functions_IVP_DVector: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>,
    /// (lower, upper) bandwidth of the symbolic jacobian, if computed
    pub bandwidth: Option<(usize, usize)>,
}

impl Jacobian {
    pub fn new() -> Self {
        Self {
            vector_of_functions: Vec::new(),
            vector_of_variables: Vec::new(),
            variable_string: Vec::new(),
            arg: "t".to_string(),
            symbolic_jacobian: Vec::new(),
            readable_jacobian: Vec::new(),
            function_jacobian_IVP_DMatrix: Box::new(|_x: f64, _y: &DVector<f64>| {
                DMatrix::from_element(2, 2, 0.0)
            }),
            lambdified_functions_IVP_DVector: Box::new(|_x: f64, _y: &DVector<f64>| {
                DVector::from_element(2, 0.0)
            }),
            bandwidth: None,
        }
    }

    /// Basic functionality: setting variables and functions
    pub fn set_vector_of_functions(&mut self, value: Vec<Expr>) {
        self.vector_of_functions = value;
    }

    pub fn set_variables(&mut self, varvec: Vec<&str>) {
        let vec_trimmed: Vec<String> = varvec.iter().map(|s| s.trim().to_string()).collect();
        let symbols = vec_trimmed.join(",");
        self.variable_string = vec_trimmed;
        self.vector_of_variables = Expr::Symbols(&symbols);
    }

    pub fn set_funcvector_from_str(&mut self, value: Vec<&str>) {
        self.vector_of_functions = Expr::parse_vector_expression(value);
    }

    /// calculate the symbolic jacobian
    pub fn calc_jacobian(&mut self) {
        assert!(
            !self.vector_of_functions.is_empty(),
            "vector_of_functions is empty"
        );
        assert!(
            !self.vector_of_variables.is_empty(),
            "vector_of_variables is empty"
        );

        let variable_string_vec = self.variable_string.clone();
        let num_vars = self.vector_of_variables.len();

        let new_jac: Vec<Vec<Expr>> = self
            .vector_of_functions
            .iter()
            .map(|func| {
                (0..num_vars)
                    .map(|j| func.diff(&variable_string_vec[j]).simplify_())
                    .collect()
            })
            .collect();

        self.symbolic_jacobian = new_jac;
    }

    /// turn jacobian into readable format
    pub fn readable_jacobian(&mut self) {
        let mut readable_jac: Vec<Vec<String>> = Vec::new();
        for row in self.symbolic_jacobian.iter() {
            readable_jac.push(row.iter().map(|el| el.to_string()).collect());
        }
        self.readable_jacobian = readable_jac;
    }

    /// Bandwidth of the symbolic jacobian: (subdiagonals, superdiagonals).
    /// Finite-volume stencils give (1, 1) per field, which is worth logging.
    pub fn find_bandwidths(&mut self) {
        let a = &self.symbolic_jacobian;
        let mut kl = 0;
        let mut ku = 0;
        for (i, row) in a.iter().enumerate() {
            for (j, el) in row.iter().enumerate() {
                if !el.is_zero() {
                    if i > j && i - j > kl {
                        kl = i - j;
                    }
                    if j > i && j - i > ku {
                        ku = j - i;
                    }
                }
            }
        }
        self.bandwidth = Some((kl, ku));
    }

    /// lambdify the function vector into the IVP form (t, y) -> f(t, y)
    pub fn lambdify_funcvector_IVP_DVector(&mut self) {
        let arg = self.arg.clone();
        let vars = self.variable_string.clone();
        let mut funcs: Vec<Box<dyn Fn(f64, &DVector<f64>) -> f64>> = Vec::new();
        for func in self.vector_of_functions.iter() {
            funcs.push(func.lambdify_IVP(&arg, &vars));
        }
        let fun = Box::new(move |t: f64, y: &DVector<f64>| {
            DVector::from_iterator(funcs.len(), funcs.iter().map(|f| f(t, y)))
        });
        self.lambdified_functions_IVP_DVector = fun;
    }

    /// lambdify the symbolic jacobian into the IVP form (t, y) -> J(t, y)
    pub fn calc_jacobian_fun_IVP_DMatrix(&mut self) {
        let arg = self.arg.clone();
        let vars = self.variable_string.clone();
        let n_funcs = self.symbolic_jacobian.len();
        let n_vars = vars.len();
        // nonzero elements only; FV stencils are tridiagonal and the dense
        // closure would otherwise evaluate a sea of zeros
        let mut elements: Vec<(usize, usize, Box<dyn Fn(f64, &DVector<f64>) -> f64>)> = Vec::new();
        for (i, row) in self.symbolic_jacobian.iter().enumerate() {
            for (j, el) in row.iter().enumerate() {
                if !el.is_zero() {
                    elements.push((i, j, el.lambdify_IVP(&arg, &vars)));
                }
            }
        }
        debug!(
            "jacobian lambdified: {} nonzeros of {}x{}",
            elements.len(),
            n_funcs,
            n_vars
        );
        let jac = Box::new(move |t: f64, y: &DVector<f64>| {
            let mut matrix = DMatrix::zeros(n_funcs, n_vars);
            for (i, j, f) in elements.iter() {
                matrix[(*i, *j)] = f(t, y);
            }
            matrix
        });
        self.function_jacobian_IVP_DMatrix = jac;
    }

    /// Full IVP pipeline: set the system, differentiate, lambdify.
    ///
    /// # Arguments
    /// * `eq_system` - vector of rhs expressions, one per state component
    /// * `values` - state variable names (defines state vector order)
    /// * `arg` - time variable name
    pub fn generate_IVP_ODEsolver(
        &mut self,
        eq_system: Vec<Expr>,
        values: Vec<String>,
        arg: String,
    ) {
        assert_eq!(
            eq_system.len(),
            values.len(),
            "one equation per state variable required"
        );
        let values_refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        self.set_variables(values_refs);
        self.set_vector_of_functions(eq_system);
        self.arg = arg;
        self.calc_jacobian();
        self.find_bandwidths();
        self.calc_jacobian_fun_IVP_DMatrix();
        self.lambdify_funcvector_IVP_DVector();
    }
}

impl Default for Jacobian {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn generate_IVP_ODEsolver_test() {
        // dy0/dt = -y0, dy1/dt = y0 - y1
        let eq1 = Expr::parse_expression("-y0");
        let eq2 = Expr::parse_expression("y0 - y1");
        let values = vec!["y0".to_string(), "y1".to_string()];
        let mut jacobian = Jacobian::new();
        jacobian.generate_IVP_ODEsolver(vec![eq1, eq2], values, "t".to_string());

        let y = DVector::from_vec(vec![2.0, 1.0]);
        let f = (jacobian.lambdified_functions_IVP_DVector)(0.0, &y);
        assert_relative_eq!(f[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 1.0, epsilon = 1e-12);

        let jac = (jacobian.function_jacobian_IVP_DMatrix)(0.0, &y);
        assert_relative_eq!(jac[(0, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(1, 1)], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_readable_jacobian_from_str() {
        let mut jacobian = Jacobian::new();
        jacobian.set_funcvector_from_str(vec!["2*x + y", "x*y"]);
        jacobian.set_variables(vec!["x", "y"]);
        jacobian.calc_jacobian();
        jacobian.readable_jacobian();
        assert_eq!(jacobian.readable_jacobian.len(), 2);
        assert_eq!(jacobian.readable_jacobian[0], vec!["2", "1"]);
        assert_eq!(jacobian.readable_jacobian[1], vec!["y", "x"]);
    }

    #[test]
    fn test_bandwidth_tridiagonal() {
        // dyi/dt = y_{i-1} - 2 y_i + y_{i+1}, the classic diffusion stencil
        let n = 5;
        let (_vars, names) = Expr::IndexedVars(n, "y");
        let mut eqs = Vec::new();
        for i in 0..n {
            let mut eq = Expr::Const(-2.0) * Expr::IndexedVar(i, "y");
            if i > 0 {
                eq += Expr::IndexedVar(i - 1, "y");
            }
            if i < n - 1 {
                eq += Expr::IndexedVar(i + 1, "y");
            }
            eqs.push(eq);
        }
        let mut jacobian = Jacobian::new();
        jacobian.generate_IVP_ODEsolver(eqs, names, "t".to_string());
        assert_eq!(jacobian.bandwidth, Some((1, 1)));
    }

    #[test]
    fn test_time_dependent_rhs() {
        let eq = Expr::parse_expression("t * y0");
        let mut jacobian = Jacobian::new();
        jacobian.generate_IVP_ODEsolver(vec![eq], vec!["y0".to_string()], "t".to_string());
        let y = DVector::from_vec(vec![3.0]);
        let f = (jacobian.lambdified_functions_IVP_DVector)(2.0, &y);
        assert_relative_eq!(f[0], 6.0, epsilon = 1e-12);
        let jac = (jacobian.function_jacobian_IVP_DMatrix)(2.0, &y);
        assert_relative_eq!(jac[(0, 0)], 2.0, epsilon = 1e-12);
    }
}
