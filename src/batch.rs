//! Tessellating many polygons at once
//!
//! Each polygon owns its parameters and tessellation shares no state, so
//! polygons are spread over the rayon thread pool when the `parallel`
//! feature is enabled and processed in order otherwise.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use log::debug;

use crate::error::Result;
use crate::mesh::MeshData;
use crate::polygon::PolygonGeometry;

/// Tessellate every polygon, keeping results in input order
///
/// One failing or degenerate polygon does not affect the others.
pub fn create_geometries(polygons: &[PolygonGeometry]) -> Vec<Result<Option<MeshData>>> {
    debug!("tessellating {} polygons", polygons.len());

    #[cfg(feature = "parallel")]
    let results = polygons
        .par_iter()
        .map(PolygonGeometry::create_geometry)
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = polygons
        .iter()
        .map(PolygonGeometry::create_geometry)
        .collect();

    results
}
