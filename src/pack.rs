//! Flat numeric serialization of polygon construction parameters
//!
//! Only the parameters travel, never the mesh: the receiving side calls
//! [`PolygonGeometry::create_geometry`] itself. Layout, one `f64` per slot:
//!
//! ```text
//! per hierarchy node, depth-first:  positionCount, holeCount, x, y, z, ...
//! radii.x, radii.y, radii.z
//! position, normal, st, tangent, bitangent, color       (0/1)
//! height, extrudedHeight, granularity, stRotation
//! perPositionHeight, closeTop, closeBottom              (0/1)
//! arcType, offsetAttribute                              (-1 = absent)
//! totalPackedLength                                     (slot count, including itself)
//! ```
//!
//! Per-position heights without an explicit bottom are marked by a NaN
//! `extrudedHeight`, so the layout carries no separate
//! `perPositionHeightExtrude` slot; readers expecting that extra slot and a
//! `0.0` extruded height will not understand this format. Floats are copied
//! bit for bit, so a round trip tessellates identically.

use glam::DVec3;

use crate::config::{ArcType, OffsetAttribute, VertexFormat};
use crate::ellipsoid::Ellipsoid;
use crate::error::{PolygonError, Result};
use crate::hierarchy::PolygonHierarchy;
use crate::polygon::PolygonGeometry;

/// Slots after the hierarchy: radii, format, four scalars, three flags, two codes, trailer
const TRAILING_SLOTS: usize = 3 + 6 + 4 + 3 + 2 + 1;

/// Number of slots [`pack_into`] writes for `polygon`
pub fn packed_length(polygon: &PolygonGeometry) -> usize {
    let mut length = 0;
    let mut stack = vec![&polygon.polygon_hierarchy];
    while let Some(node) = stack.pop() {
        length += 2 + node.positions.len() * 3;
        stack.extend(node.holes.iter());
    }
    length + TRAILING_SLOTS
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Pack `polygon` into a new vector
pub fn to_packed(polygon: &PolygonGeometry) -> Vec<f64> {
    let mut packed = Vec::with_capacity(packed_length(polygon));

    let mut stack = vec![&polygon.polygon_hierarchy];
    while let Some(node) = stack.pop() {
        packed.push(node.positions.len() as f64);
        packed.push(node.holes.len() as f64);
        packed.extend(node.positions.iter().flat_map(|p| p.to_array()));
        // Reversed so the first hole is written next
        stack.extend(node.holes.iter().rev());
    }

    packed.extend(polygon.ellipsoid.radii().to_array());

    let format = polygon.vertex_format;
    packed.extend([
        flag(format.position),
        flag(format.normal),
        flag(format.st),
        flag(format.tangent),
        flag(format.bitangent),
        flag(format.color),
    ]);

    let extruded_height = if polygon.per_position_height && !polygon.per_position_height_extrude {
        f64::NAN
    } else {
        polygon.extruded_height
    };
    packed.extend([
        polygon.height,
        extruded_height,
        polygon.granularity,
        polygon.st_rotation,
        flag(polygon.per_position_height),
        flag(polygon.close_top),
        flag(polygon.close_bottom),
        polygon.arc_type.code() as f64,
        polygon.offset_attribute.map_or(-1.0, |o| o.code() as f64),
    ]);

    packed.push((packed.len() + 1) as f64);
    packed
}

/// Pack `polygon` into `array` starting at `start`
///
/// The vector grows as needed; slots outside the written range are left
/// untouched. Returns the index after the last written slot.
pub fn pack_into(polygon: &PolygonGeometry, array: &mut Vec<f64>, start: usize) -> usize {
    let packed = to_packed(polygon);
    let end = start + packed.len();
    if array.len() < end {
        array.resize(end, 0.0);
    }
    array[start..end].copy_from_slice(&packed);
    end
}

/// Cursor over a packed slice
struct Reader<'a> {
    array: &'a [f64],
    start: usize,
    index: usize,
}

impl<'a> Reader<'a> {
    fn next(&mut self, what: &str) -> Result<f64> {
        let value = self.array.get(self.index).copied().ok_or_else(|| {
            PolygonError::InvalidPackedData(format!(
                "buffer ends at slot {} while reading {}",
                self.index, what
            ))
        })?;
        self.index += 1;
        Ok(value)
    }

    fn remaining(&self) -> usize {
        self.array.len().saturating_sub(self.index)
    }

    /// A non-negative integer no larger than `per_item` times the remaining slots allow
    fn count(&mut self, what: &str, per_item: usize) -> Result<usize> {
        let value = self.next(what)?;
        if !(value.is_finite() && value >= 0.0 && value.fract() == 0.0) {
            return Err(PolygonError::InvalidPackedData(format!(
                "{} must be a non-negative integer (got {})",
                what, value
            )));
        }
        let count = value as usize;
        if count.saturating_mul(per_item) > self.remaining() {
            return Err(PolygonError::InvalidPackedData(format!(
                "{} of {} exceeds the remaining buffer",
                what, count
            )));
        }
        Ok(count)
    }

    fn flag(&mut self, what: &str) -> Result<bool> {
        Ok(self.next(what)? != 0.0)
    }

    fn code(&mut self, what: &str) -> Result<i64> {
        let value = self.next(what)?;
        if !(value.is_finite() && value.fract() == 0.0) {
            return Err(PolygonError::InvalidPackedData(format!(
                "{} must be an integer code (got {})",
                what, value
            )));
        }
        Ok(value as i64)
    }

    /// One node header and its positions; returns the node and its hole count
    fn node(&mut self) -> Result<(PolygonHierarchy, usize)> {
        let position_count = self.count("position count", 3)?;
        // Every hole needs at least its own two header slots
        let hole_count = self.count("hole count", 2)?;
        let mut positions = Vec::with_capacity(position_count);
        for _ in 0..position_count {
            let x = self.next("position")?;
            let y = self.next("position")?;
            let z = self.next("position")?;
            positions.push(DVec3::new(x, y, z));
        }
        Ok((PolygonHierarchy::new(positions), hole_count))
    }

    fn hierarchy(&mut self) -> Result<PolygonHierarchy> {
        let (root, hole_count) = self.node()?;
        if hole_count == 0 {
            return Ok(root);
        }

        // Nodes still collecting holes, with the number left to read
        let mut open = vec![(root, hole_count)];
        loop {
            let Some((_, remaining)) = open.last_mut() else {
                break;
            };
            if *remaining == 0 {
                let Some((finished, _)) = open.pop() else {
                    break;
                };
                match open.last_mut() {
                    Some((parent, _)) => parent.holes.push(finished),
                    None => return Ok(finished),
                }
                continue;
            }
            *remaining -= 1;

            let (child, child_holes) = self.node()?;
            if child_holes == 0 {
                if let Some((parent, _)) = open.last_mut() {
                    parent.holes.push(child);
                }
            } else {
                open.push((child, child_holes));
            }
        }

        Err(PolygonError::InvalidPackedData(
            "unbalanced hierarchy".to_string(),
        ))
    }
}

/// Read a polygon packed at `start`
///
/// # Errors
///
/// Returns `InvalidPackedData` for truncated buffers, malformed counts,
/// unknown arc type or offset codes, and a length trailer that does not
/// match the slots read.
pub fn unpack(array: &[f64], start: usize) -> Result<PolygonGeometry> {
    let mut reader = Reader {
        array,
        start,
        index: start,
    };

    let polygon_hierarchy = reader.hierarchy()?;

    let radii = [
        reader.next("radius")?,
        reader.next("radius")?,
        reader.next("radius")?,
    ];
    if !radii.iter().all(|r| r.is_finite() && *r > 0.0) {
        return Err(PolygonError::InvalidPackedData(format!(
            "ellipsoid radii must be finite and positive, got {radii:?}"
        )));
    }
    let ellipsoid = Ellipsoid::new(radii[0], radii[1], radii[2]);

    let vertex_format = VertexFormat {
        position: reader.flag("vertex format")?,
        normal: reader.flag("vertex format")?,
        st: reader.flag("vertex format")?,
        tangent: reader.flag("vertex format")?,
        bitangent: reader.flag("vertex format")?,
        color: reader.flag("vertex format")?,
    };

    let height = reader.next("height")?;
    let packed_extruded_height = reader.next("extruded height")?;
    let granularity = reader.next("granularity")?;
    let st_rotation = reader.next("texture rotation")?;
    let per_position_height = reader.flag("per-position height")?;
    let close_top = reader.flag("close top")?;
    let close_bottom = reader.flag("close bottom")?;

    let arc_code = reader.code("arc type")?;
    let arc_type = u8::try_from(arc_code)
        .ok()
        .and_then(ArcType::from_code)
        .ok_or_else(|| PolygonError::InvalidPackedData(format!("unknown arc type {}", arc_code)))?;

    let offset_code = reader.code("offset attribute")?;
    let offset_attribute = if offset_code == -1 {
        None
    } else {
        let offset = i8::try_from(offset_code)
            .ok()
            .and_then(OffsetAttribute::from_code)
            .ok_or_else(|| {
                PolygonError::InvalidPackedData(format!("unknown offset attribute {}", offset_code))
            })?;
        Some(offset)
    };

    let expected = reader.index - reader.start + 1;
    let trailer = reader.next("packed length")?;
    if trailer != expected as f64 {
        return Err(PolygonError::InvalidPackedData(format!(
            "packed length trailer is {} but {} slots were read",
            trailer, expected
        )));
    }

    let (extruded_height, per_position_height_extrude) = if packed_extruded_height.is_nan() {
        (height, false)
    } else {
        (packed_extruded_height, per_position_height)
    };

    Ok(PolygonGeometry::from_parts(
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

/// Packed slots as little-endian bytes, for byte-oriented transports
pub fn to_bytes(polygon: &PolygonGeometry) -> Vec<u8> {
    let packed = to_packed(polygon);
    let mut buffer = Vec::with_capacity(packed.len() * 8);
    for value in packed {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
    buffer
}

/// Read a polygon written by [`to_bytes`]
///
/// # Errors
///
/// Returns `InvalidPackedData` if the length is not a multiple of 8 or the
/// slots do not unpack.
pub fn from_bytes(bytes: &[u8]) -> Result<PolygonGeometry> {
    if bytes.len() % 8 != 0 {
        return Err(PolygonError::InvalidPackedData(format!(
            "byte length {} is not a multiple of 8",
            bytes.len()
        )));
    }
    let slots: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut slot = [0u8; 8];
            slot.copy_from_slice(chunk);
            f64::from_le_bytes(slot)
        })
        .collect();
    unpack(&slots, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolygonGeometryBuilder;
    use std::f64::consts::FRAC_PI_3;

    fn nested() -> PolygonGeometry {
        let e = Ellipsoid::wgs84();
        let hierarchy = PolygonHierarchy::with_holes(
            e.from_degrees_array(&[-124.0, 35.0, -110.0, 35.0, -110.0, 40.0]),
            vec![PolygonHierarchy::with_holes(
                e.from_degrees_array(&[-122.0, 36.0, -112.0, 36.0, -112.0, 39.0]),
                vec![PolygonHierarchy::new(
                    e.from_degrees_array(&[-120.0, 36.5, -114.0, 36.5, -114.0, 38.5]),
                )],
            )],
        );
        PolygonGeometryBuilder::new()
            .polygon_hierarchy(hierarchy)
            .vertex_format(VertexFormat::POSITION_ONLY)
            .granularity(FRAC_PI_3)
            .unwrap()
            .per_position_height(true)
            .close_top(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_packed_length_matches_output() {
        let polygon = nested();
        let packed = to_packed(&polygon);
        assert_eq!(packed.len(), packed_length(&polygon));
        assert_eq!(packed.len(), 52);
        assert_eq!(packed[51], 52.0);
    }

    #[test]
    fn test_nested_round_trip() {
        let polygon = nested();
        let restored = unpack(&to_packed(&polygon), 0).unwrap();
        assert_eq!(restored, polygon);
        assert_eq!(restored.polygon_hierarchy().node_count(), 3);
    }

    #[test]
    fn test_pack_into_offset() {
        let polygon = nested();
        let mut array = vec![7.0; 4];
        let end = pack_into(&polygon, &mut array, 2);
        assert_eq!(end, 2 + packed_length(&polygon));
        assert_eq!(array[..2], [7.0, 7.0]);
        assert_eq!(unpack(&array, 2).unwrap(), polygon);
    }

    #[test]
    fn test_missing_bottom_packs_as_nan() {
        let polygon = nested();
        let packed = to_packed(&polygon);
        // height, extrudedHeight sit right after the six format flags
        assert_eq!(packed[42], 0.0);
        assert!(packed[43].is_nan());
    }

    #[test]
    fn test_truncated_buffer_is_rejected() {
        let packed = to_packed(&nested());
        let result = unpack(&packed[..packed.len() - 1], 0);
        assert!(matches!(result, Err(PolygonError::InvalidPackedData(_))));
    }

    #[test]
    fn test_bad_trailer_is_rejected() {
        let mut packed = to_packed(&nested());
        let last = packed.len() - 1;
        packed[last] = 12.0;
        assert!(unpack(&packed, 0).is_err());
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        let mut packed = to_packed(&nested());
        let arc = packed.len() - 3;
        packed[arc] = 9.0;
        assert!(matches!(unpack(&packed, 0), Err(PolygonError::InvalidPackedData(_))));

        let mut packed = to_packed(&nested());
        let offset = packed.len() - 2;
        packed[offset] = 4.0;
        assert!(unpack(&packed, 0).is_err());
    }

    #[test]
    fn test_degenerate_radii_are_rejected() {
        // three nodes of three positions each precede the radii
        for radius in [0.0, -6_378_137.0, f64::NAN, f64::INFINITY] {
            let mut packed = to_packed(&nested());
            packed[34] = radius;
            assert!(
                matches!(unpack(&packed, 0), Err(PolygonError::InvalidPackedData(_))),
                "radius {radius}"
            );
        }
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let mut packed = to_packed(&nested());
        packed[0] = 1e12;
        assert!(unpack(&packed, 0).is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let polygon = nested();
        let bytes = to_bytes(&polygon);
        assert_eq!(bytes.len(), 52 * 8);
        assert_eq!(from_bytes(&bytes).unwrap(), polygon);
        assert!(from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
