//! Geometry of a 1D computational domain.
//!
//! A geometry is the symbolic description of where a field lives: a named
//! domain with min/max bounds (usually constants, kept as `Expr` so bounds
//! may be parameterized) and a coordinate system. The mesh module turns a
//! geometry into actual node and edge positions.

use crate::pde::model::PdeError;
use crate::symbolic::symbolic_engine::Expr;
use strum_macros::{Display, EnumString};

/// Coordinate system of a 1D domain.
///
/// `SphericalPolar` means the coordinate is the radius of a sphere and the
/// divergence picks up the `1/r^2 d/dr(r^2 ...)` weighting in the finite
/// volume discretisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum CoordinateSystem {
    Cartesian1D,
    SphericalPolar,
}

/// A named 1D domain with symbolic bounds.
#[derive(Debug, Clone)]
pub struct Geometry1D {
    pub domain: String,
    pub min: Expr,
    pub max: Expr,
    pub coordinate_system: CoordinateSystem,
}

impl Geometry1D {
    pub fn new(
        domain: &str,
        min: Expr,
        max: Expr,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self, PdeError> {
        let geom = Geometry1D {
            domain: domain.to_string(),
            min,
            max,
            coordinate_system,
        };
        geom.bounds()?;
        Ok(geom)
    }

    /// Unit sphere radius domain, the workhorse of particle diffusion setups.
    pub fn unit_sphere(domain: &str) -> Self {
        Geometry1D {
            domain: domain.to_string(),
            min: Expr::Const(0.0),
            max: Expr::Const(1.0),
            coordinate_system: CoordinateSystem::SphericalPolar,
        }
    }

    /// Evaluates the symbolic bounds to numbers, validating them.
    pub fn bounds(&self) -> Result<(f64, f64), PdeError> {
        let min = self.eval_bound(&self.min)?;
        let max = self.eval_bound(&self.max)?;
        if min >= max {
            return Err(PdeError::Geometry(format!(
                "domain '{}' has min {} >= max {}",
                self.domain, min, max
            )));
        }
        if self.coordinate_system == CoordinateSystem::SphericalPolar && min < 0.0 {
            return Err(PdeError::Geometry(format!(
                "spherical domain '{}' has negative inner radius {}",
                self.domain, min
            )));
        }
        Ok((min, max))
    }

    fn eval_bound(&self, bound: &Expr) -> Result<f64, PdeError> {
        match bound.simplify_() {
            Expr::Const(val) => Ok(val),
            other => Err(PdeError::Geometry(format!(
                "domain '{}' bound {} does not reduce to a constant",
                self.domain, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_unit_sphere_bounds() {
        let geom = Geometry1D::unit_sphere("negative particle");
        assert_eq!(geom.bounds().unwrap(), (0.0, 1.0));
    }

    #[test]
    fn test_symbolic_bounds_fold() {
        let geom = Geometry1D::new(
            "electrode",
            Expr::Const(0.0),
            Expr::Const(2.0) * Expr::Const(0.5),
            CoordinateSystem::Cartesian1D,
        )
        .unwrap();
        assert_eq!(geom.bounds().unwrap(), (0.0, 1.0));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let res = Geometry1D::new(
            "bad",
            Expr::Const(1.0),
            Expr::Const(0.0),
            CoordinateSystem::Cartesian1D,
        );
        assert!(matches!(res, Err(PdeError::Geometry(_))));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let res = Geometry1D::new(
            "bad sphere",
            Expr::Const(-1.0),
            Expr::Const(1.0),
            CoordinateSystem::SphericalPolar,
        );
        assert!(matches!(res, Err(PdeError::Geometry(_))));
    }

    #[test]
    fn test_coordinate_system_from_str() {
        assert_eq!(
            CoordinateSystem::from_str("SphericalPolar").unwrap(),
            CoordinateSystem::SphericalPolar
        );
        assert!(CoordinateSystem::from_str("Toroidal").is_err());
    }
}
