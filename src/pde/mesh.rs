//! 1D mesh generation.
//!
//! A `Uniform1DSubMesh` holds the node (cell centre) and edge positions of a
//! single domain; a `Mesh` maps domain names to submeshes. The finite volume
//! method reads cell volumes and edge weights from here, which is where the
//! coordinate system enters: spherical shells have volume
//! `(r_out^3 - r_in^3)/3` and edge fluxes are weighted by `r^2`.

use crate::pde::geometry::{CoordinateSystem, Geometry1D};
use crate::pde::model::PdeError;
use itertools::Itertools;
use nalgebra::DVector;
use num_traits::Float;
use std::collections::HashMap;

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace<T: Float>(start: T, end: T, n: usize) -> Vec<T> {
    assert!(n >= 2, "linspace needs at least two points");
    let step = (end - start) / T::from(n - 1).unwrap();
    (0..n)
        .map(|i| start + step * T::from(i).unwrap())
        .collect()
}

/// Uniform 1D submesh of a single domain: cell-centred finite volume layout.
///
/// Invariants: `nodes.len() == npts`, `edges.len() == npts + 1`, nodes are
/// strictly increasing and node i lies midway between edges i and i+1.
#[derive(Debug, Clone)]
pub struct Uniform1DSubMesh {
    pub domain: String,
    pub coordinate_system: CoordinateSystem,
    /// cell centre positions
    pub nodes: DVector<f64>,
    /// cell interface positions, including both domain boundaries
    pub edges: DVector<f64>,
    /// uniform cell width
    pub h: f64,
    pub npts: usize,
}

impl Uniform1DSubMesh {
    pub fn new(geometry: &Geometry1D, npts: usize) -> Result<Self, PdeError> {
        if npts < 2 {
            return Err(PdeError::Mesh(format!(
                "domain '{}': at least 2 mesh points required, got {}",
                geometry.domain, npts
            )));
        }
        let (min, max) = geometry.bounds()?;
        let edges_vec = linspace(min, max, npts + 1);
        let nodes_vec: Vec<f64> = edges_vec
            .iter()
            .tuple_windows()
            .map(|(a, b)| 0.5 * (a + b))
            .collect();
        let h = (max - min) / npts as f64;
        Ok(Uniform1DSubMesh {
            domain: geometry.domain.clone(),
            coordinate_system: geometry.coordinate_system,
            nodes: DVector::from_vec(nodes_vec),
            edges: DVector::from_vec(edges_vec),
            h,
            npts,
        })
    }

    /// Control volume of each cell.
    pub fn cell_volumes(&self) -> DVector<f64> {
        match self.coordinate_system {
            CoordinateSystem::Cartesian1D => DVector::from_element(self.npts, self.h),
            CoordinateSystem::SphericalPolar => DVector::from_iterator(
                self.npts,
                (0..self.npts).map(|i| {
                    let r_in = self.edges[i];
                    let r_out = self.edges[i + 1];
                    (r_out.powi(3) - r_in.powi(3)) / 3.0
                }),
            ),
        }
    }

    /// Geometric weight of the flux through each edge (`r^2` on a sphere).
    pub fn edge_weights(&self) -> DVector<f64> {
        match self.coordinate_system {
            CoordinateSystem::Cartesian1D => DVector::from_element(self.npts + 1, 1.0),
            CoordinateSystem::SphericalPolar => {
                DVector::from_iterator(self.npts + 1, self.edges.iter().map(|r| r * r))
            }
        }
    }
}

/// The complete computational grid: one submesh per domain.
pub struct Mesh {
    submeshes: HashMap<String, Uniform1DSubMesh>,
}

impl Mesh {
    /// Generates submeshes for each geometry with the requested number of
    /// points per domain.
    pub fn new(
        geometries: &[Geometry1D],
        npts: &HashMap<String, usize>,
    ) -> Result<Self, PdeError> {
        let mut submeshes = HashMap::new();
        for geometry in geometries {
            let n = *npts.get(&geometry.domain).ok_or_else(|| {
                PdeError::Mesh(format!(
                    "no mesh point count given for domain '{}'",
                    geometry.domain
                ))
            })?;
            submeshes.insert(geometry.domain.clone(), Uniform1DSubMesh::new(geometry, n)?);
        }
        Ok(Mesh { submeshes })
    }

    pub fn get(&self, domain: &str) -> Result<&Uniform1DSubMesh, PdeError> {
        self.submeshes
            .get(domain)
            .ok_or_else(|| PdeError::Mesh(format!("unknown domain '{}'", domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sphere_mesh(npts: usize) -> Uniform1DSubMesh {
        let geom = Geometry1D::unit_sphere("particle");
        Uniform1DSubMesh::new(&geom, npts).unwrap()
    }

    #[test]
    fn test_mesh_counts_and_ordering() {
        let mesh = sphere_mesh(10);
        assert_eq!(mesh.nodes.len(), 10);
        assert_eq!(mesh.edges.len(), 11);
        for (a, b) in mesh.nodes.iter().tuple_windows() {
            assert!(a < b);
        }
        // node i between edges i and i+1
        for i in 0..mesh.npts {
            assert!(mesh.edges[i] < mesh.nodes[i] && mesh.nodes[i] < mesh.edges[i + 1]);
        }
    }

    #[test]
    fn test_nodes_are_cell_centres() {
        let mesh = sphere_mesh(4);
        assert_relative_eq!(mesh.nodes[0], 0.125, epsilon = 1e-12);
        assert_relative_eq!(mesh.nodes[3], 0.875, epsilon = 1e-12);
        assert_relative_eq!(mesh.h, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_spherical_volumes_sum_to_sphere() {
        let mesh = sphere_mesh(20);
        let total: f64 = mesh.cell_volumes().iter().sum();
        // sum of shells = R^3/3 (the 4*pi factor cancels throughout)
        assert_relative_eq!(total, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cartesian_volumes() {
        let geom = Geometry1D::new(
            "line",
            crate::symbolic::symbolic_engine::Expr::Const(0.0),
            crate::symbolic::symbolic_engine::Expr::Const(2.0),
            CoordinateSystem::Cartesian1D,
        )
        .unwrap();
        let mesh = Uniform1DSubMesh::new(&geom, 8).unwrap();
        let volumes = mesh.cell_volumes();
        for v in volumes.iter() {
            assert_relative_eq!(*v, 0.25, epsilon = 1e-12);
        }
        assert!(mesh.edge_weights().iter().all(|w| *w == 1.0));
    }

    #[test]
    fn test_too_few_points_rejected() {
        let geom = Geometry1D::unit_sphere("particle");
        assert!(matches!(
            Uniform1DSubMesh::new(&geom, 1),
            Err(PdeError::Mesh(_))
        ));
    }

    #[test]
    fn test_mesh_map_lookup() {
        let geom = Geometry1D::unit_sphere("particle");
        let mut npts = HashMap::new();
        npts.insert("particle".to_string(), 5);
        let mesh = Mesh::new(&[geom], &npts).unwrap();
        assert!(mesh.get("particle").is_ok());
        assert!(matches!(mesh.get("electrolyte"), Err(PdeError::Mesh(_))));
    }
}
