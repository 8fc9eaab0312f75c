//! Lambdification - converting symbolic expressions to executable closures.
//!
//! Variable positions are resolved once at build time, so the returned
//! closures do no string lookups per call. The IVP forms treat the first
//! argument (time) separately from the state variables, which is the shape
//! the time integrators consume.

use crate::symbolic::symbolic_engine::Expr;
use nalgebra::DVector;

impl Expr {
    /// Converts the expression into a closure over a slice of variable values.
    ///
    /// # Arguments
    /// * `vars` - variable names; position in the slice defines the argument order
    ///
    /// # Panics
    /// Panics at build time if the expression contains a variable not listed
    /// in `vars`.
    pub fn lambdify_slice(&self, vars: &[String]) -> Box<dyn Fn(&[f64]) -> f64> {
        match self {
            Expr::Var(name) => {
                let idx = vars
                    .iter()
                    .position(|v| v == name)
                    .unwrap_or_else(|| panic!("variable {} not found in {:?}", name, vars));
                Box::new(move |x: &[f64]| x[idx])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_slice(vars);
                let rhs_fn = rhs.lambdify_slice(vars);
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_slice(vars);
                let rhs_fn = rhs.lambdify_slice(vars);
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_slice(vars);
                let rhs_fn = rhs.lambdify_slice(vars);
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_slice(vars);
                let rhs_fn = rhs.lambdify_slice(vars);
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify_slice(vars);
                let exp_fn = exp.lambdify_slice(vars);
                Box::new(move |x| base_fn(x).powf(exp_fn(x)))
            }
            Expr::Exp(inner) => {
                let inner_fn = inner.lambdify_slice(vars);
                Box::new(move |x| inner_fn(x).exp())
            }
            Expr::Ln(inner) => {
                let inner_fn = inner.lambdify_slice(vars);
                Box::new(move |x| inner_fn(x).ln())
            }
        }
    }

    /// Converts a single-variable symbolic expression into an executable closure.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64> {
        let vars = self.all_arguments_are_variables();
        if vars.len() == 1 {
            let compiled_func = self.lambdify_slice(&vars);
            Box::new(move |x| compiled_func(&[x]))
        } else if vars.is_empty() {
            // constant expression
            let compiled_func = self.lambdify_slice(&[]);
            Box::new(move |_| compiled_func(&[]))
        } else {
            panic!(
                "lambdify1D can only be used with expressions containing exactly one variable, found: {:?}",
                vars
            );
        }
    }

    /// IVP lambdification: closure of `(t, y)` where `arg` is the time
    /// variable and `vars` name the components of the state vector `y`.
    pub fn lambdify_IVP(
        &self,
        arg: &str,
        vars: &[String],
    ) -> Box<dyn Fn(f64, &DVector<f64>) -> f64> {
        let mut all_vars: Vec<String> = vec![arg.to_string()];
        all_vars.extend(vars.iter().cloned());
        let compiled_func = self.lambdify_slice(&all_vars);
        let n = vars.len();
        Box::new(move |t: f64, y: &DVector<f64>| {
            let mut args = Vec::with_capacity(n + 1);
            args.push(t);
            args.extend(y.iter().copied());
            compiled_func(&args)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lambdify1d() {
        let x = Expr::Var("x".to_string());
        let f = x.pow(Expr::Const(2.0));
        let func = f.lambdify1D();
        assert_relative_eq!(func(3.0), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify1d_constant() {
        let f = Expr::Const(7.5);
        let func = f.lambdify1D();
        assert_relative_eq!(func(123.0), 7.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_slice_order() {
        let expr = Expr::parse_expression("x - y");
        let vars = vec!["x".to_string(), "y".to_string()];
        let f = expr.lambdify_slice(&vars);
        assert_relative_eq!(f(&[5.0, 2.0]), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_ivp() {
        // dc/dt style expression: t*c0 + c1
        let expr = Expr::parse_expression("t*c0 + c1");
        let vars = vec!["c0".to_string(), "c1".to_string()];
        let f = expr.lambdify_IVP("t", &vars);
        let y = DVector::from_vec(vec![2.0, 3.0]);
        assert_relative_eq!(f(4.0, &y), 11.0, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn test_unknown_variable_panics_at_build() {
        let expr = Expr::parse_expression("x + z");
        let vars = vec!["x".to_string()];
        let _ = expr.lambdify_slice(&vars);
    }
}
