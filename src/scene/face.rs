use crate::geometry::{Triangle, Vector4};

/// A single triangle of the scene, ready to be packed for the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub positions: Triangle<Vector4>,
    pub normals: Triangle<Vector4>,
    /// Unit normal of the triangle plane, following the vertex winding
    pub face_normal: Vector4,
    /// Position of the face in the list of its object
    pub index: usize,
    /// Index into the scene materials, `None` when the face has no known material
    pub material: Option<usize>,
}

impl Face {
    /// Creates a face with explicit vertex normals.
    pub fn new(
        positions: Triangle<Vector4>,
        normals: Triangle<Vector4>,
        index: usize,
        material: Option<usize>,
    ) -> Face {
        Face {
            face_normal: positions.unit_normal(),
            positions,
            normals,
            index,
            material,
        }
    }

    /// Creates a face whose vertex normals are all the face normal.
    pub fn flat(positions: Triangle<Vector4>, index: usize, material: Option<usize>) -> Face {
        let face_normal = positions.unit_normal();
        Face {
            positions,
            normals: Triangle::new(face_normal, face_normal, face_normal),
            face_normal,
            index,
            material,
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vector4> {
        self.positions.iter()
    }
}
