/// a module that turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedPDE::symbolic::symbolic_engine::Expr;
/// let input = "2*r^2 + exp(-t)";
/// let parsed_expression = Expr::parse_expression(input);
/// println!("parsed_expression {}", parsed_expression);
/// let f = parsed_expression.lambdify_slice(&["r".to_string(), "t".to_string()]);
/// println!("{} at (1, 0) = {}", input, f(&[1.0, 0.0]));
/// ```
pub mod parse_expr;
///________________________________________________________________________________________________
/// # Symbolic engine
/// a module that
/// 1) represents expressions as a symbolic tree
/// 2) differentiates them analytically
/// 3) turns them into Rust closures
///# Example
/// ```
/// use RustedPDE::symbolic::symbolic_engine::Expr;
/// let r = Expr::Var("r".to_string());
/// let f = r.clone() * r.clone() + Expr::Const(1.0);
/// let df_dr = f.diff("r");
/// println!("df_dr = {}", df_dr);
/// let fun = f.lambdify1D();
/// println!("f(2) = {}", fun(2.0));
/// ```
pub mod symbolic_engine;
pub mod symbolic_diff;
pub mod symbolic_simplify;
/// lambdification of expressions into closures over slices, scalars and
/// nalgebra vectors
pub mod symbolic_lambdify;
///________________________________________________________________________________________________
/// calculate a symbolic Jacobian of an equation system and lambdify it
/// Example#
/// ```
/// use RustedPDE::symbolic::symbolic_functions::Jacobian;
/// use nalgebra::DVector;
/// let mut jacobian_instance = Jacobian::new();
/// use RustedPDE::symbolic::symbolic_engine::Expr;
/// let eq_system = Expr::parse_vector_expression(vec!["-y0 + y1", "-y1"]);
/// jacobian_instance.generate_IVP_ODEsolver(
///     eq_system,
///     vec!["y0".to_string(), "y1".to_string()],
///     "t".to_string(),
/// );
/// let jac = &jacobian_instance.function_jacobian_IVP_DMatrix;
/// let j = jac(0.0, &DVector::from_vec(vec![1.0, 1.0]));
/// println!("J = {}", j);
/// ```
pub mod symbolic_functions;
