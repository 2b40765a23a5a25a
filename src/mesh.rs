use std::convert::TryFrom;
use std::f32::consts::PI;

use nalgebra::{Point2, Point3, Vector3};
use thiserror::Error;

/// Floats per vertex in the interleaved layout: position (3), normal (3), uv (2).
pub const VERTEX_STRIDE: usize = 8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("sphere needs at least one latitude and one longitude segment, got {lat} x {lon}")]
    InvalidSegments { lat: u32, lon: u32 },
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("mesh has {0} vertices, which does not fit a 16-bit index buffer")]
    TooManyVertices(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Point2<f32>,
}

/// A latitude/longitude sphere centered on the origin.
///
/// The vertex grid has `(lat_segments + 1) * (lon_segments + 1)` entries. Vertices along
/// the seam (first and last longitude) and at the poles coincide in position, but carry
/// different texture coordinates, so they must not be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Builds a sphere of the given radius.
///
/// Row `i` of the grid sits at polar angle `i * PI / lat_segments`, measured from +y, and
/// column `j` at azimuth `j * 2 PI / lon_segments`, measured from +x towards +z.
pub fn generate_sphere(
    radius: f32,
    lat_segments: u32,
    lon_segments: u32,
) -> Result<SphereMesh, MeshError> {
    if lat_segments == 0 || lon_segments == 0 {
        return Err(MeshError::InvalidSegments {
            lat: lat_segments,
            lon: lon_segments,
        });
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(MeshError::InvalidRadius(radius));
    }

    let row_len = lon_segments + 1;
    let mut vertices = Vec::with_capacity(((lat_segments + 1) * row_len) as usize);
    for lat in 0..=lat_segments {
        let theta = lat as f32 * PI / lat_segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=lon_segments {
            let phi = lon as f32 * 2.0 * PI / lon_segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let unit = Vector3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            vertices.push(Vertex {
                position: Point3::from(unit * radius),
                normal: unit,
                uv: Point2::new(
                    lon as f32 / lon_segments as f32,
                    lat as f32 / lat_segments as f32,
                ),
            });
        }
    }

    let mut indices = Vec::with_capacity((6 * lat_segments * lon_segments) as usize);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let first = lat * row_len + lon;
            let second = first + row_len;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Ok(SphereMesh { vertices, indices })
}

impl SphereMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Flattens the vertices into `VERTEX_STRIDE` floats each: position, normal, uv.
    ///
    /// This is the single-buffer layout. The kiss3d renderer binds one attribute per
    /// buffer and uses `positions`, `normals` and `uvs` instead; this is for consumers
    /// that want everything in one vertex buffer.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * VERTEX_STRIDE);
        for v in self.vertices.iter() {
            data.extend_from_slice(&[
                v.position.x,
                v.position.y,
                v.position.z,
                v.normal.x,
                v.normal.y,
                v.normal.z,
                v.uv.x,
                v.uv.y,
            ]);
        }
        data
    }

    pub fn positions(&self) -> Vec<Point3<f32>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    pub fn normals(&self) -> Vec<Vector3<f32>> {
        self.vertices.iter().map(|v| v.normal).collect()
    }

    pub fn uvs(&self) -> Vec<Point2<f32>> {
        self.vertices.iter().map(|v| v.uv).collect()
    }

    /// Triangles in the form kiss3d's element buffers expect.
    pub fn faces_u16(&self) -> Result<Vec<Point3<u16>>, MeshError> {
        let too_many = MeshError::TooManyVertices(self.vertices.len());
        self.triangles()
            .map(|[a, b, c]| {
                let convert = |i: u32| u16::try_from(i).map_err(|_| too_many.clone());
                Ok(Point3::new(convert(a)?, convert(b)?, convert(c)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_vertices_on_sphere() {
        for &(radius, lat, lon) in &[(0.1, 3, 3), (1.0, 7, 12), (2.5, 40, 40), (13.0, 5, 64)] {
            let mesh = generate_sphere(radius, lat, lon).unwrap();
            assert_eq!(mesh.vertex_count(), ((lat + 1) * (lon + 1)) as usize);

            for v in mesh.vertices.iter() {
                assert_relative_eq!(v.position.coords.norm(), radius, max_relative = 1e-5);
                assert_relative_eq!(v.normal.norm(), 1.0, max_relative = 1e-5);
                assert_relative_eq!(
                    v.normal,
                    v.position.coords.normalize(),
                    epsilon = 1e-5
                );
            }
        }
    }

    #[test]
    fn test_index_validity() {
        let (lat, lon) = (9, 17);
        let mesh = generate_sphere(1.0, lat, lon).unwrap();

        assert_eq!(mesh.triangle_count(), (2 * lat * lon) as usize);
        assert_eq!(mesh.indices.len(), mesh.triangle_count() * 3);
        for &i in mesh.indices.iter() {
            assert!((i as usize) < mesh.vertex_count());
        }
    }

    #[test]
    fn test_minimal_fixture() {
        let mesh = generate_sphere(1.0, 2, 2).unwrap();

        #[rustfmt::skip]
        let expected_positions = [
            // north pole, repeated for every longitude
            (0.0, 1.0, 0.0), (0.0, 1.0, 0.0), (0.0, 1.0, 0.0),
            // equator: phi = 0, pi, 2pi
            (1.0, 0.0, 0.0), (-1.0, 0.0, 0.0), (1.0, 0.0, 0.0),
            // south pole
            (0.0, -1.0, 0.0), (0.0, -1.0, 0.0), (0.0, -1.0, 0.0),
        ];
        #[rustfmt::skip]
        let expected_uvs = [
            (0.0, 0.0), (0.5, 0.0), (1.0, 0.0),
            (0.0, 0.5), (0.5, 0.5), (1.0, 0.5),
            (0.0, 1.0), (0.5, 1.0), (1.0, 1.0),
        ];

        assert_eq!(mesh.vertex_count(), 9);
        for (v, (&(x, y, z), &(u, w))) in mesh
            .vertices
            .iter()
            .zip(expected_positions.iter().zip(expected_uvs.iter()))
        {
            assert_abs_diff_eq!(v.position, Point3::new(x, y, z), epsilon = 1e-6);
            assert_abs_diff_eq!(v.uv, Point2::new(u, w), epsilon = 1e-6);
        }

        #[rustfmt::skip]
        let expected_indices: Vec<u32> = vec![
            0, 3, 1,  3, 4, 1,
            1, 4, 2,  4, 5, 2,
            3, 6, 4,  6, 7, 4,
            4, 7, 5,  7, 8, 5,
        ];
        assert_eq!(mesh.indices, expected_indices);
    }

    #[test]
    fn test_generation_is_pure() {
        let a = generate_sphere(0.7, 12, 24).unwrap();
        let b = generate_sphere(0.7, 12, 24).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seam_vertices() {
        let lon = 8;
        let mesh = generate_sphere(1.0, 4, lon).unwrap();
        let row_len = (lon + 1) as usize;

        for row in mesh.vertices.chunks(row_len) {
            let (first, last) = (row[0], row[row_len - 1]);
            assert_abs_diff_eq!(first.position, last.position, epsilon = 1e-6);
            assert_abs_diff_eq!(first.normal, last.normal, epsilon = 1e-6);
            assert_eq!(first.uv.x, 0.0);
            assert_eq!(last.uv.x, 1.0);
        }
    }

    #[test]
    fn test_consistent_winding() {
        // Every non-degenerate triangle must face the same way relative to the outward
        // normal, otherwise culling and lighting would disagree across the surface.
        let mesh = generate_sphere(1.0, 10, 16).unwrap();
        let mut signs = vec![];
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (
                mesh.vertices[a as usize].position,
                mesh.vertices[b as usize].position,
                mesh.vertices[c as usize].position,
            );
            let face_normal = (b - a).cross(&(c - a));
            if face_normal.norm() < 1e-6 {
                continue; // collapsed at a pole
            }
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            signs.push(face_normal.dot(&centroid).signum());
        }

        assert!(!signs.is_empty());
        assert!(signs.iter().all(|&s| s == signs[0]));
    }

    #[test]
    fn test_interleaved_layout() {
        let mesh = generate_sphere(2.0, 3, 4).unwrap();
        let data = mesh.interleaved();
        assert_eq!(data.len(), mesh.vertex_count() * VERTEX_STRIDE);

        let v = mesh.vertices[7];
        let chunk = &data[7 * VERTEX_STRIDE..8 * VERTEX_STRIDE];
        assert_eq!(
            chunk,
            &[
                v.position.x,
                v.position.y,
                v.position.z,
                v.normal.x,
                v.normal.y,
                v.normal.z,
                v.uv.x,
                v.uv.y
            ]
        );
    }

    #[test]
    fn test_faces_u16() {
        let mesh = generate_sphere(1.0, 40, 40).unwrap();
        let faces = mesh.faces_u16().unwrap();
        assert_eq!(faces.len(), mesh.triangle_count());
        assert_eq!(faces[0], Point3::new(0, 41, 1));

        let huge = generate_sphere(1.0, 300, 300).unwrap();
        assert_eq!(
            huge.faces_u16(),
            Err(MeshError::TooManyVertices(301 * 301))
        );
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            generate_sphere(1.0, 0, 5),
            Err(MeshError::InvalidSegments { lat: 0, lon: 5 })
        );
        assert_eq!(
            generate_sphere(1.0, 5, 0),
            Err(MeshError::InvalidSegments { lat: 5, lon: 0 })
        );
        assert_eq!(generate_sphere(0.0, 5, 5), Err(MeshError::InvalidRadius(0.0)));
        assert_eq!(
            generate_sphere(-1.0, 5, 5),
            Err(MeshError::InvalidRadius(-1.0))
        );
        assert!(generate_sphere(f32::NAN, 5, 5).is_err());
    }
}
