//! PolygonGeometry main structure

use std::sync::OnceLock;

use glam::DVec3;

use crate::config::{ArcType, OffsetAttribute, PolygonOptions, VertexFormat};
use crate::ellipsoid::Ellipsoid;
use crate::error::{PolygonError, Result};
use crate::hierarchy::PolygonHierarchy;
use crate::math::EPSILON2;
use crate::mesh::MeshData;
use crate::tessellation;
use crate::tessellation::attributes::texture_rotation_points;
use crate::tessellation::bounds;
use crate::volume::Rectangle;

/// A polygon on an ellipsoid, ready to be tessellated
///
/// Construction only captures and validates parameters. The mesh is built
/// by [`create_geometry`](Self::create_geometry), which is pure and can run
/// on any thread; the geographic rectangle and texture rotation points are
/// derived lazily on first access.
///
/// # Examples
///
/// ```
/// use rust_polygon_geometry::*;
///
/// let ellipsoid = Ellipsoid::wgs84();
/// let polygon = PolygonGeometryBuilder::new()
///     .positions(ellipsoid.from_degrees_array(&[
///         -72.0, 40.0, -70.0, 35.0, -75.0, 30.0, -70.0, 30.0, -68.0, 40.0,
///     ]))
///     .build()
///     .unwrap();
///
/// if let Some(mesh) = polygon.create_geometry().unwrap() {
///     println!("{} triangles", mesh.triangle_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PolygonGeometry {
    pub(crate) polygon_hierarchy: PolygonHierarchy,
    pub(crate) ellipsoid: Ellipsoid,
    pub(crate) vertex_format: VertexFormat,
    pub(crate) granularity: f64,
    pub(crate) st_rotation: f64,

    /// Top height, always at or above `extruded_height` without per-position heights
    pub(crate) height: f64,
    pub(crate) extruded_height: f64,

    pub(crate) per_position_height: bool,
    /// Per-position heights with an explicit bottom
    pub(crate) per_position_height_extrude: bool,
    pub(crate) close_top: bool,
    pub(crate) close_bottom: bool,
    pub(crate) arc_type: ArcType,
    pub(crate) offset_attribute: Option<OffsetAttribute>,

    rectangle: OnceLock<Rectangle>,
    texture_rotation_points: OnceLock<[f64; 6]>,
}

impl PolygonGeometry {
    /// Capture and validate construction options
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for the cases listed on
    /// [`PolygonOptions::validate`]
    pub fn new(options: PolygonOptions) -> Result<Self> {
        options.validate()?;
        let PolygonOptions {
            polygon_hierarchy,
            ellipsoid,
            vertex_format,
            granularity,
            st_rotation,
            height,
            extruded_height,
            per_position_height,
            close_top,
            close_bottom,
            arc_type,
            offset_attribute,
        } = options;

        let polygon_hierarchy = polygon_hierarchy.ok_or_else(|| {
            PolygonError::InvalidArgument("polygon hierarchy is required".to_string())
        })?;

        let per_position_height_extrude = per_position_height && extruded_height.is_some();
        let mut height = height.unwrap_or(0.0);
        let mut extruded_height = extruded_height.unwrap_or(height);
        if !per_position_height && extruded_height > height {
            std::mem::swap(&mut height, &mut extruded_height);
        }

        Ok(Self::from_parts(
            polygon_hierarchy,
            ellipsoid,
            vertex_format,
            granularity,
            st_rotation,
            height,
            extruded_height,
            per_position_height,
            per_position_height_extrude,
            close_top,
            close_bottom,
            arc_type,
            offset_attribute,
        ))
    }

    /// Build a polygon from a single ring without holes
    ///
    /// Any hierarchy already set in `options` is replaced.
    ///
    /// # Errors
    ///
    /// See [`PolygonGeometry::new`]
    pub fn from_positions(positions: Vec<DVec3>, options: PolygonOptions) -> Result<Self> {
        Self::new(PolygonOptions {
            polygon_hierarchy: Some(PolygonHierarchy::new(positions)),
            ..options
        })
    }

    /// Assemble already resolved parameters, as read back from a packed buffer
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        polygon_hierarchy: PolygonHierarchy,
        ellipsoid: Ellipsoid,
        vertex_format: VertexFormat,
        granularity: f64,
        st_rotation: f64,
        height: f64,
        extruded_height: f64,
        per_position_height: bool,
        per_position_height_extrude: bool,
        close_top: bool,
        close_bottom: bool,
        arc_type: ArcType,
        offset_attribute: Option<OffsetAttribute>,
    ) -> Self {
        Self {
            polygon_hierarchy,
            ellipsoid,
            vertex_format,
            granularity,
            st_rotation,
            height,
            extruded_height,
            per_position_height,
            per_position_height_extrude,
            close_top,
            close_bottom,
            arc_type,
            offset_attribute,
            rectangle: OnceLock::new(),
            texture_rotation_points: OnceLock::new(),
        }
    }

    /// Tessellate the polygon
    ///
    /// Returns `Ok(None)` when the input collapses to nothing, for example
    /// when every position of the outer ring is a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the arc type is `None`, which only an
    /// unpacked buffer can carry.
    pub fn create_geometry(&self) -> Result<Option<MeshData>> {
        tessellation::create_geometry(self)
    }

    /// Whether the mesh has a bottom surface and walls
    pub fn is_extruded(&self) -> bool {
        self.per_position_height_extrude
            || (self.height - self.extruded_height).abs() > EPSILON2
    }

    /// Geographic extent of the outer ring, computed on first access
    pub fn rectangle(&self) -> &Rectangle {
        self.rectangle.get_or_init(|| {
            bounds::compute_rectangle(&self.polygon_hierarchy.positions, &self.ellipsoid)
        })
    }

    /// Texture rotation reference points, computed on first access
    ///
    /// `[u0, v0, u1, v1, u2, v2]`: the minimum corner, the maximum-v corner
    /// and the maximum-u corner of the rotated texture frame, expressed in
    /// the unrotated frame.
    pub fn texture_coordinate_rotation_points(&self) -> &[f64; 6] {
        self.texture_rotation_points.get_or_init(|| {
            texture_rotation_points(
                &self.polygon_hierarchy.positions,
                &self.ellipsoid,
                self.st_rotation,
            )
        })
    }

    /// Compute the geographic rectangle of `options` without building a geometry
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the hierarchy is missing or the arc
    /// type is `None`
    pub fn compute_rectangle(options: &PolygonOptions) -> Result<Rectangle> {
        let mut rectangle = Rectangle::default();
        Self::compute_rectangle_into(options, &mut rectangle)?;
        Ok(rectangle)
    }

    /// Like [`compute_rectangle`](Self::compute_rectangle), writing into `result`
    ///
    /// # Errors
    ///
    /// See [`compute_rectangle`](Self::compute_rectangle)
    pub fn compute_rectangle_into<'r>(
        options: &PolygonOptions,
        result: &'r mut Rectangle,
    ) -> Result<&'r mut Rectangle> {
        let hierarchy = options.polygon_hierarchy.as_ref().ok_or_else(|| {
            PolygonError::InvalidArgument("polygon hierarchy is required".to_string())
        })?;
        if options.arc_type == ArcType::None {
            return Err(PolygonError::InvalidArgument(
                "arc type must be Geodesic or Rhumb".to_string(),
            ));
        }
        *result = bounds::compute_rectangle(&hierarchy.positions, &options.ellipsoid);
        Ok(result)
    }

    pub fn polygon_hierarchy(&self) -> &PolygonHierarchy {
        &self.polygon_hierarchy
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn vertex_format(&self) -> VertexFormat {
        self.vertex_format
    }

    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    pub fn st_rotation(&self) -> f64 {
        self.st_rotation
    }

    /// Height of the top surface
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Height of the bottom surface (equal to `height` when not extruded)
    pub fn extruded_height(&self) -> f64 {
        self.extruded_height
    }

    pub fn per_position_height(&self) -> bool {
        self.per_position_height
    }

    pub fn close_top(&self) -> bool {
        self.close_top
    }

    pub fn close_bottom(&self) -> bool {
        self.close_bottom
    }

    pub fn arc_type(&self) -> ArcType {
        self.arc_type
    }

    pub fn offset_attribute(&self) -> Option<OffsetAttribute> {
        self.offset_attribute
    }
}

impl PartialEq for PolygonGeometry {
    fn eq(&self, other: &Self) -> bool {
        self.polygon_hierarchy == other.polygon_hierarchy
            && self.ellipsoid == other.ellipsoid
            && self.vertex_format == other.vertex_format
            && self.granularity == other.granularity
            && self.st_rotation == other.st_rotation
            && self.height == other.height
            && self.extruded_height == other.extruded_height
            && self.per_position_height == other.per_position_height
            && self.per_position_height_extrude == other.per_position_height_extrude
            && self.close_top == other.close_top
            && self.close_bottom == other.close_bottom
            && self.arc_type == other.arc_type
            && self.offset_attribute == other.offset_attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolygonGeometryBuilder;

    fn quad() -> Vec<DVec3> {
        Ellipsoid::wgs84().from_degrees_array(&[-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0])
    }

    #[test]
    fn test_heights_are_ordered_top_first() {
        let polygon = PolygonGeometryBuilder::new()
            .positions(quad())
            .height(100.0)
            .extruded_height(5000.0)
            .build()
            .unwrap();

        assert_eq!(polygon.height(), 5000.0);
        assert_eq!(polygon.extruded_height(), 100.0);
        assert!(polygon.is_extruded());
    }

    #[test]
    fn test_extruded_height_defaults_to_height() {
        let polygon = PolygonGeometryBuilder::new()
            .positions(quad())
            .height(250.0)
            .build()
            .unwrap();

        assert_eq!(polygon.extruded_height(), 250.0);
        assert!(!polygon.is_extruded());
    }

    #[test]
    fn test_tiny_extrusion_is_flat() {
        let polygon = PolygonGeometryBuilder::new()
            .positions(quad())
            .extruded_height(1e-7)
            .build()
            .unwrap();
        assert!(!polygon.is_extruded());
    }

    #[test]
    fn test_per_position_height_with_bottom_always_extrudes() {
        let polygon = PolygonGeometryBuilder::new()
            .positions(quad())
            .per_position_height(true)
            .extruded_height(0.0)
            .build()
            .unwrap();
        assert!(polygon.per_position_height_extrude);
        assert!(polygon.is_extruded());
    }

    #[test]
    fn test_from_positions_replaces_hierarchy() {
        let options = PolygonOptions {
            polygon_hierarchy: Some(PolygonHierarchy::default()),
            ..Default::default()
        };
        let polygon = PolygonGeometry::from_positions(quad(), options).unwrap();
        assert_eq!(polygon.polygon_hierarchy().positions.len(), 4);
    }

    #[test]
    fn test_missing_hierarchy_is_rejected() {
        assert!(matches!(
            PolygonGeometry::new(PolygonOptions::default()),
            Err(PolygonError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rectangle_is_cached() {
        let polygon = PolygonGeometryBuilder::new().positions(quad()).build().unwrap();
        let first = polygon.rectangle() as *const Rectangle;
        let second = polygon.rectangle() as *const Rectangle;
        assert_eq!(first, second);
        assert!((polygon.rectangle().west.to_degrees() + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_compute_rectangle_into_returns_same_instance() {
        let options = PolygonOptions {
            polygon_hierarchy: Some(PolygonHierarchy::new(quad())),
            ..Default::default()
        };
        let mut result = Rectangle::default();
        let address = &result as *const Rectangle;
        let returned = PolygonGeometry::compute_rectangle_into(&options, &mut result).unwrap();
        assert_eq!(&*returned as *const Rectangle, address);
        assert!((returned.north.to_degrees() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_compute_rectangle_rejects_disabled_arcs() {
        let options = PolygonOptions {
            polygon_hierarchy: Some(PolygonHierarchy::new(quad())),
            arc_type: ArcType::None,
            ..Default::default()
        };
        assert!(PolygonGeometry::compute_rectangle(&options).is_err());
    }

    #[test]
    fn test_equality_ignores_caches() {
        let a = PolygonGeometryBuilder::new().positions(quad()).build().unwrap();
        let b = a.clone();
        let _ = a.rectangle();
        assert_eq!(a, b);
    }
}
