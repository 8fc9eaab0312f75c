//! # Symbolic Differentiation Module
//!
//! Extends the symbolic engine with analytical differentiation and direct
//! evaluation. Differentiation is the backbone of the implicit time
//! integrator: the jacobian of the discretised ODE system is obtained by
//! differentiating every per-node equation with respect to every per-node
//! unknown (see `symbolic_functions::Jacobian`).
//!
//! ## Key Methods
//! - `diff(var: &str)` - Analytical partial derivative
//! - `eval_expression(vars, values)` - Direct evaluation without closure creation
//! - `all_arguments_are_variables()` - Extract variable names in order of appearance

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard differentiation rules:
    /// - Power rule: d/dx(f^g) for constant g, general case via exp/ln identity
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule for exp and ln
    ///
    /// # Arguments
    /// * `var` - Variable name to differentiate with respect to
    ///
    /// # Returns
    /// New symbolic expression representing the derivative (not simplified)
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) => match **exp {
                // power rule shortcut for constant exponents, the common case
                // for stencil expressions
                Expr::Const(n) => Expr::Mul(
                    Box::new(Expr::Mul(
                        Box::new(Expr::Const(n)),
                        Box::new(Expr::Pow(base.clone(), Box::new(Expr::Const(n - 1.0)))),
                    )),
                    Box::new(base.diff(var)),
                ),
                // general case: f^g = exp(g*ln(f))
                _ => {
                    let f = base.clone();
                    let g = exp.clone();
                    let inner = Expr::Mul(g, Box::new(Expr::Ln(f)));
                    Expr::Mul(
                        Box::new(Expr::Pow(base.clone(), exp.clone())),
                        Box::new(inner.diff(var)),
                    )
                }
            },
            Expr::Exp(inner) => Expr::Mul(
                Box::new(Expr::Exp(inner.clone())),
                Box::new(inner.diff(var)),
            ),
            Expr::Ln(inner) => Expr::Div(Box::new(inner.diff(var)), inner.clone()),
        }
    }

    /// Direct evaluation of the expression given variable names and values.
    ///
    /// Slower than lambdification when called repeatedly but handy for
    /// one-shot evaluations (e.g. initial conditions on mesh nodes).
    pub fn eval_expression(&self, vars: Vec<&str>, values: &[f64]) -> f64 {
        assert_eq!(
            vars.len(),
            values.len(),
            "vars and values must have the same length"
        );
        match self {
            Expr::Var(name) => {
                let i = vars
                    .iter()
                    .position(|v| v == name)
                    .unwrap_or_else(|| panic!("variable {} not found in {:?}", name, vars));
                values[i]
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) + rhs.eval_expression(vars, values)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) - rhs.eval_expression(vars, values)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) * rhs.eval_expression(vars, values)
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) / rhs.eval_expression(vars, values)
            }
            Expr::Pow(base, exp) => base
                .eval_expression(vars.clone(), values)
                .powf(exp.eval_expression(vars, values)),
            Expr::Exp(inner) => inner.eval_expression(vars, values).exp(),
            Expr::Ln(inner) => inner.eval_expression(vars, values).ln(),
        }
    }

    /// Collects all variable names appearing in the expression, in order of
    /// first appearance, without duplicates.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, acc: &mut Vec<String>) {
        match self {
            Expr::Var(name) => {
                if !acc.contains(name) {
                    acc.push(name.clone());
                }
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(acc);
                rhs.collect_variables(acc);
            }
            Expr::Exp(inner) | Expr::Ln(inner) => inner.collect_variables(acc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diff_power_rule() {
        let x = Expr::Var("x".to_string());
        let f = x.pow(Expr::Const(3.0));
        let df = f.diff("x").simplify_();
        // 3*x^2
        let val = df.eval_expression(vec!["x"], &[2.0]);
        assert_relative_eq!(val, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_product_rule() {
        let (x, y) = {
            let mut it = Expr::Symbols("x, y").into_iter();
            (it.next().unwrap(), it.next().unwrap())
        };
        let f = x.clone() * y.clone();
        assert_relative_eq!(
            f.diff("x").simplify_().eval_expression(vec!["x", "y"], &[3.0, 5.0]),
            5.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            f.diff("y").simplify_().eval_expression(vec!["x", "y"], &[3.0, 5.0]),
            3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_diff_quotient_vs_numerical() {
        let x = Expr::Var("x".to_string());
        let f = Expr::Const(1.0) / (x.clone() + Expr::Const(2.0));
        let df = f.diff("x");
        let x0 = 1.3;
        let h = 1e-6;
        let numerical = (f.eval_expression(vec!["x"], &[x0 + h])
            - f.eval_expression(vec!["x"], &[x0 - h]))
            / (2.0 * h);
        assert_relative_eq!(
            df.eval_expression(vec!["x"], &[x0]),
            numerical,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_diff_exp_chain() {
        let x = Expr::Var("x".to_string());
        let f = (x.clone() * Expr::Const(2.0)).exp();
        let df = f.diff("x").simplify_();
        let val = df.eval_expression(vec!["x"], &[0.5]);
        assert_relative_eq!(val, 2.0 * (1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_all_arguments_are_variables() {
        let expr = Expr::parse_expression("a*x + b*x^2");
        assert_eq!(expr.all_arguments_are_variables(), vec!["a", "x", "b"]);
    }
}
