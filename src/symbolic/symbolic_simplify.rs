//! Algebraic simplification for symbolic expressions.
//!
//! The discretiser produces a great deal of `0 * cX` and `cX + 0` terms when
//! stencil matrices are expanded into per-node expressions, so the simplifier
//! is applied to every emitted equation and to every jacobian element. Rules
//! are applied bottom-up in a single recursive pass; `simplify_` iterates the
//! pass until a fixed point is reached.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// One bottom-up simplification pass.
    ///
    /// Rules: constant folding, x+0, 0+x, x-0, x*0, 0*x, x*1, 1*x, 0/x, x/1,
    /// x^0, x^1, exp(0), ln(1).
    pub fn simplify_once(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(a), _) if *a == 0.0 => r,
                    (_, Expr::Const(b)) if *b == 0.0 => l,
                    _ => Expr::Add(l.boxed(), r.boxed()),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(b)) if *b == 0.0 => l,
                    _ if l == r => Expr::Const(0.0),
                    _ => Expr::Sub(l.boxed(), r.boxed()),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
                    (_, Expr::Const(b)) if *b == 0.0 => Expr::Const(0.0),
                    (Expr::Const(a), _) if *a == 1.0 => r,
                    (_, Expr::Const(b)) if *b == 1.0 => l,
                    _ => Expr::Mul(l.boxed(), r.boxed()),
                }
            }
            Expr::Div(lhs, rhs) => {
                let l = lhs.simplify_once();
                let r = rhs.simplify_once();
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
                    (_, Expr::Const(b)) if *b == 1.0 => l,
                    _ => Expr::Div(l.boxed(), r.boxed()),
                }
            }
            Expr::Pow(base, exp) => {
                let b = base.simplify_once();
                let e = exp.simplify_once();
                match (&b, &e) {
                    (Expr::Const(a), Expr::Const(n)) => Expr::Const(a.powf(*n)),
                    (_, Expr::Const(n)) if *n == 0.0 => Expr::Const(1.0),
                    (_, Expr::Const(n)) if *n == 1.0 => b,
                    _ => Expr::Pow(b.boxed(), e.boxed()),
                }
            }
            Expr::Exp(inner) => {
                let i = inner.simplify_once();
                match &i {
                    Expr::Const(v) if *v == 0.0 => Expr::Const(1.0),
                    Expr::Const(v) => Expr::Const(v.exp()),
                    _ => Expr::Exp(i.boxed()),
                }
            }
            Expr::Ln(inner) => {
                let i = inner.simplify_once();
                match &i {
                    Expr::Const(v) if *v == 1.0 => Expr::Const(0.0),
                    _ => Expr::Ln(i.boxed()),
                }
            }
        }
    }

    /// Simplify to a fixed point (bounded number of passes).
    pub fn simplify_(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..10 {
            let next = current.simplify_once();
            if next == current {
                return next;
            }
            current = next;
        }
        current
    }
}
