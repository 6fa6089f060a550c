/// Triangle meshes for the viewer
use nalgebra::{Point3, Vector3};

/// Largest extent of a model after [`Mesh::center_and_scale`].
pub const FIT_SIZE: f32 = 4.0;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Triangle with a flat normal derived from its winding.
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c);
        Self {
            vertices: [
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ],
        }
    }

    /// Face normal of the triangle, recomputed from current positions.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        face_normal(&a.position, &b.position, &c.position)
    }

    pub fn centroid(&self) -> Point3<f32> {
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.position.coords);
        Point3::from(sum / 3.0)
    }
}

/// Unit normal of a counter-clockwise triangle, `+Z` when degenerate.
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    (b - a)
        .cross(&(c - a))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z)
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Build a mesh from shared positions and polygon faces.
    ///
    /// Polygons are fan-triangulated around their first corner. Faces with
    /// fewer than three corners or out-of-range indices are skipped.
    pub fn from_polygons(positions: &[Point3<f32>], faces: &[Vec<usize>]) -> Self {
        let mut mesh = Self::with_capacity(faces.len());
        for face in faces {
            if face.len() < 3 || face.iter().any(|&i| i >= positions.len()) {
                continue;
            }
            let anchor = positions[face[0]];
            for pair in face[1..].windows(2) {
                mesh.add_triangle(Triangle::flat(anchor, positions[pair[0]], positions[pair[1]]));
            }
        }
        mesh
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut positions = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// Move the bounding-box center to the origin and scale the largest
    /// extent to [`FIT_SIZE`].
    pub fn center_and_scale(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let center = nalgebra::center(&min, &max);
        let extent = (max - min).max();
        let scale = if extent > 0.0 { FIT_SIZE / extent } else { 1.0 };

        for vertex in self.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            vertex.position = Point3::from((vertex.position - center) * scale);
        }
    }

    /// Axis-aligned cube centered at the origin.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners: Vec<Point3<f32>> = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { -h } else { h },
                    if i & 2 == 0 { -h } else { h },
                    if i & 4 == 0 { -h } else { h },
                )
            })
            .collect();
        // Counter-clockwise when seen from outside
        let faces = [
            vec![4, 5, 7, 6], // +z
            vec![0, 2, 3, 1], // -z
            vec![2, 6, 7, 3], // +y
            vec![0, 1, 5, 4], // -y
            vec![1, 3, 7, 5], // +x
            vec![0, 4, 6, 2], // -x
        ];
        Self::from_polygons(&corners, &faces)
    }
}
