//! Tessellate a few polygons and print mesh statistics
//!
//! Run with `RUST_LOG=debug` to see the pipeline's log output.

use rust_polygon_geometry::*;

fn main() -> Result<()> {
    env_logger::init();

    let ellipsoid = Ellipsoid::wgs84();

    let outline = ellipsoid.from_degrees_array(&[
        -124.0, 35.0, -110.0, 35.0, -110.0, 40.0, -124.0, 40.0,
    ]);
    let lake = ellipsoid.from_degrees_array(&[
        -122.0, 36.0, -122.0, 39.0, -112.0, 39.0, -112.0, 36.0,
    ]);
    let island = ellipsoid.from_degrees_array(&[
        -120.0, 36.5, -114.0, 36.5, -114.0, 38.5, -120.0, 38.5,
    ]);
    let hierarchy = PolygonHierarchy::with_holes(
        outline,
        vec![PolygonHierarchy::with_holes(lake, vec![PolygonHierarchy::new(island)])],
    );

    let flat = PolygonGeometryBuilder::new()
        .polygon_hierarchy(hierarchy.clone())
        .build()?;

    let extruded = PolygonGeometryBuilder::new()
        .polygon_hierarchy(hierarchy)
        .vertex_format(VertexFormat::ALL)
        .height(2_000.0)
        .extruded_height(30_000.0)
        .offset_attribute(OffsetAttribute::Top)
        .build()?;

    let rhumb = PolygonGeometryBuilder::new()
        .positions(ellipsoid.from_degrees_array(&[
            -30.0, -30.0, 30.0, -30.0, 30.0, 30.0, -30.0, 30.0,
        ]))
        .vertex_format(VertexFormat::POSITION_ONLY)
        .arc_type(ArcType::Rhumb)
        .build()?;

    let r = extruded.rectangle();
    println!(
        "Rectangle: west {:.3}, south {:.3}, east {:.3}, north {:.3} (degrees)",
        r.west.to_degrees(),
        r.south.to_degrees(),
        r.east.to_degrees(),
        r.north.to_degrees()
    );

    // Ship the parameters as a worker would receive them
    let packed = pack::to_packed(&extruded);
    println!("Packed extruded polygon into {} slots", packed.len());
    let received = pack::unpack(&packed, 0)?;

    let polygons = [flat, received, rhumb];
    let names = ["flat with holes", "extruded (unpacked)", "rhumb 60x60 degrees"];

    for (name, result) in names.iter().zip(create_geometries(&polygons)) {
        match result {
            Ok(Some(mesh)) => println!(
                "{:>22}: {:>6} vertices, {:>6} triangles, bounding radius {:.0} m",
                name,
                mesh.vertex_count(),
                mesh.triangle_count(),
                mesh.bounding_sphere.radius
            ),
            Ok(None) => println!("{:>22}: degenerate", name),
            Err(e) => println!("{:>22}: error: {}", name, e),
        }
    }

    Ok(())
}
