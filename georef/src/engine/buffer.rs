//! Buffering composed from the engine primitives: discretised disks around vertices and rectangles along segments,
//! merged with boolean union.

use std::f64::consts::FRAC_PI_2;

use geo::BooleanOps;
use geo_types::{coord, Coord, Geometry, LineString, MultiPolygon, Polygon};

use super::{union_all, union_multi};

/// Returns the area within `distance` of the geometry.
///
/// `resolution` is the number of segments used to approximate a quarter of a circle. Negative distances shrink
/// polygons; points and lines buffered by a non-positive distance are empty.
///
/// Every distinct vertex contributes a disk of `4 * resolution` points and every segment a rectangle, and all of
/// them are merged with boolean union. The cost therefore grows with the number of vertices times `resolution`:
/// simplify long lines or lower the resolution when buffering detailed geometries.
pub fn buffer(geometry: &Geometry, distance: f64, resolution: u32) -> MultiPolygon {
    let segments = resolution.max(1) * 4;

    match geometry {
        Geometry::Point(point) => {
            if distance > 0.0 {
                MultiPolygon::new(vec![disk(point.0, distance, segments)])
            } else {
                empty()
            }
        }
        Geometry::Line(line) => buffer_line(&[line.start, line.end], distance, segments),
        Geometry::LineString(line) => buffer_line(&line.0, distance, segments),
        Geometry::Polygon(polygon) => buffer_polygon(polygon, distance, segments),
        Geometry::MultiPoint(points) => {
            if distance > 0.0 {
                union_all(points.iter().map(|point| disk(point.0, distance, segments)))
            } else {
                empty()
            }
        }
        Geometry::MultiLineString(lines) => union_multi(
            lines
                .iter()
                .map(|line| buffer_line(&line.0, distance, segments))
                .collect(),
        ),
        Geometry::MultiPolygon(polygons) => union_multi(
            polygons
                .iter()
                .map(|polygon| buffer_polygon(polygon, distance, segments))
                .collect(),
        ),
        Geometry::GeometryCollection(collection) => union_multi(
            collection
                .iter()
                .map(|geometry| buffer(geometry, distance, resolution))
                .collect(),
        ),
        Geometry::Rect(rect) => buffer_polygon(&rect.to_polygon(), distance, segments),
        Geometry::Triangle(triangle) => buffer_polygon(&triangle.to_polygon(), distance, segments),
    }
}

fn empty() -> MultiPolygon {
    MultiPolygon::new(vec![])
}

// Vertices are shifted by half a step so that they never coincide with the corners of segment rectangles.
fn disk(center: Coord, radius: f64, segments: u32) -> Polygon {
    let step = FRAC_PI_2 * 4.0 / segments as f64;
    let mut ring: Vec<Coord> = (0..segments)
        .map(|i| {
            let angle = step * (i as f64 + 0.5);
            coord! {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);

    Polygon::new(LineString::new(ring), vec![])
}

fn segment_rect(start: Coord, end: Coord, half_width: f64) -> Option<Polygon> {
    let delta = end - start;
    let length = delta.x.hypot(delta.y);
    if length == 0.0 {
        return None;
    }

    let normal = coord! {
        x: -delta.y / length * half_width,
        y: delta.x / length * half_width,
    };

    Some(Polygon::new(
        LineString::new(vec![
            start + normal,
            end + normal,
            end - normal,
            start - normal,
            start + normal,
        ]),
        vec![],
    ))
}

fn chain_pieces(coords: &[Coord], distance: f64, segments: u32) -> Vec<Polygon> {
    let mut vertices = coords.to_vec();
    vertices.dedup();
    // Closed rings repeat the first vertex.
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    let disks = vertices.into_iter().map(|c| disk(c, distance, segments));
    let rects = coords
        .windows(2)
        .filter_map(|pair| segment_rect(pair[0], pair[1], distance));

    disks.chain(rects).collect()
}

fn buffer_line(coords: &[Coord], distance: f64, segments: u32) -> MultiPolygon {
    if distance <= 0.0 || coords.is_empty() {
        return empty();
    }

    union_all(chain_pieces(coords, distance, segments))
}

fn buffer_polygon(polygon: &Polygon, distance: f64, segments: u32) -> MultiPolygon {
    let own = MultiPolygon::new(vec![polygon.clone()]);
    if distance == 0.0 || polygon.exterior().0.is_empty() {
        return own;
    }

    let boundary = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| chain_pieces(&ring.0, distance.abs(), segments));
    let band = union_all(boundary);

    if distance > 0.0 {
        own.union(&band)
    } else {
        own.difference(&band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::{Area, Contains, EuclideanLength};
    use geo_types::{line_string, point, polygon};
    use std::f64::consts::PI;

    #[test]
    fn point_buffer_is_a_disk() {
        let buffered = buffer(&point!(x: 10.0, y: 20.0).into(), 5.0, 1000);
        assert_eq!(buffered.0.len(), 1);
        assert_eq!(buffered.0[0].exterior().0.len(), 4001);
        assert_abs_diff_eq!(buffered.unsigned_area(), PI * 25.0, epsilon = 1e-4);
    }

    #[test]
    fn low_resolution_point_buffer() {
        let buffered = buffer(&point!(x: 0.0, y: 0.0).into(), 1.0, 1);
        // Square with the diagonal of 2.
        assert_abs_diff_eq!(buffered.unsigned_area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_point_buffer_is_empty() {
        assert!(buffer(&point!(x: 0.0, y: 0.0).into(), 0.0, 16).0.is_empty());
        assert!(buffer(&point!(x: 0.0, y: 0.0).into(), -1.0, 16).0.is_empty());
    }

    #[test]
    fn line_buffer_is_a_capsule() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let buffered = buffer(&line.into(), 1.0, 64);

        assert_eq!(buffered.0.len(), 1);
        assert_abs_diff_eq!(buffered.unsigned_area(), 20.0 + PI, epsilon = 1e-2);
        assert!(buffered.contains(&point!(x: 5.0, y: 0.9)));
        assert!(!buffered.contains(&point!(x: 5.0, y: 1.1)));
    }

    #[test]
    fn dense_line_buffer() {
        // Quarter of a circle of radius 10, with a repeated last vertex.
        let mut coords: Vec<Coord> = (0..=100)
            .map(|i| {
                let angle = FRAC_PI_2 * i as f64 / 100.0;
                coord! { x: 10.0 * angle.cos(), y: 10.0 * angle.sin() }
            })
            .collect();
        coords.push(coords[100]);
        let line = LineString::new(coords);
        let length = line.euclidean_length();

        let buffered = buffer(&line.into(), 1.0, 16);
        assert_eq!(buffered.0.len(), 1);
        assert_abs_diff_eq!(buffered.unsigned_area(), 2.0 * length + PI, epsilon = 5e-2);
    }

    #[test]
    fn repeated_vertices_get_one_disk() {
        let ring = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 0.0, y: 0.0 },
        ];
        // Three disks and three rectangles.
        assert_eq!(chain_pieces(&ring, 0.5, 16).len(), 6);
    }

    #[test]
    fn polygon_grows_and_shrinks() {
        let square: Geometry = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]
        .into();

        let grown = buffer(&square, 1.0, 64);
        assert_abs_diff_eq!(grown.unsigned_area(), 100.0 + 40.0 + PI, epsilon = 1e-2);

        let shrunk = buffer(&square, -1.0, 64);
        assert_abs_diff_eq!(shrunk.unsigned_area(), 64.0, epsilon = 1e-6);

        assert_abs_diff_eq!(buffer(&square, 0.0, 64).unsigned_area(), 100.0);
    }

    #[test]
    fn distant_points_stay_separate() {
        let points: Geometry =
            geo_types::MultiPoint::new(vec![point!(x: 0.0, y: 0.0), point!(x: 10.0, y: 0.0)])
                .into();
        assert_eq!(buffer(&points, 1.0, 16).0.len(), 2);
    }
}
