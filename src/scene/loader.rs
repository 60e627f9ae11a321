use wavefront_obj::obj::{Object, Primitive, Vertex};

use crate::geometry::{Triangle, Vector4};

use super::{Face, MaterialTable, MissingMaterialPolicy, SceneLoadError};

/// Converts the triangles of one OBJ object into faces.
///
/// Non-triangle primitives are skipped. Vertices without a normal get the face normal.
pub(super) fn load_faces(
    object: &Object,
    materials: &MaterialTable,
    policy: MissingMaterialPolicy,
) -> Result<Vec<Face>, SceneLoadError> {
    let mut faces = Vec::new();
    let mut skipped = 0usize;

    for geometry in &object.geometry {
        let material =
            resolve_material(object, geometry.material_name.as_deref(), materials, policy)?;

        for shape in &geometry.shapes {
            // wavefront_obj hands out the last vertex of a face first
            let Primitive::Triangle(c, a, b) = shape.primitive else {
                skipped += 1;
                continue;
            };
            let index = faces.len();
            let positions = Triangle::new(
                position(object, index, a.0)?,
                position(object, index, b.0)?,
                position(object, index, c.0)?,
            );
            let face_normal = positions.unit_normal();
            let normals = Triangle::new(
                normal(object, index, a.2)?.unwrap_or(face_normal),
                normal(object, index, b.2)?.unwrap_or(face_normal),
                normal(object, index, c.2)?.unwrap_or(face_normal),
            );

            faces.push(Face {
                positions,
                normals,
                face_normal,
                index,
                material,
            });
        }
    }

    if skipped > 0 {
        tracing::warn!(object = %object.name, skipped, "Skipped non-triangle primitives");
    }
    tracing::debug!(object = %object.name, face_count = faces.len(), "Loaded object");

    Ok(faces)
}

fn resolve_material(
    object: &Object,
    name: Option<&str>,
    materials: &MaterialTable,
    policy: MissingMaterialPolicy,
) -> Result<Option<usize>, SceneLoadError> {
    let Some(name) = name else {
        tracing::warn!(object = %object.name, "Geometry without material");
        return Ok(None);
    };

    match (materials.index_of(name), policy) {
        (Some(index), _) => Ok(Some(index)),
        (None, MissingMaterialPolicy::Sentinel) => {
            tracing::warn!(object = %object.name, material = name, "Unknown material");
            Ok(None)
        }
        (None, MissingMaterialPolicy::Fail) => Err(SceneLoadError::UnknownMaterial {
            object: object.name.clone(),
            material: name.to_owned(),
        }),
    }
}

fn position(object: &Object, face: usize, index: usize) -> Result<Vector4, SceneLoadError> {
    let v = lookup(object, &object.vertices, face, "vertex", index)?;
    Ok(Vector4::point(v.x as f32, v.y as f32, v.z as f32))
}

fn normal(
    object: &Object,
    face: usize,
    index: Option<usize>,
) -> Result<Option<Vector4>, SceneLoadError> {
    index
        .map(|index| {
            let n = lookup(object, &object.normals, face, "normal", index)?;
            Ok(Vector4::direction(n.x as f32, n.y as f32, n.z as f32))
        })
        .transpose()
}

fn lookup<'a>(
    object: &Object,
    items: &'a [Vertex],
    face: usize,
    kind: &'static str,
    index: usize,
) -> Result<&'a Vertex, SceneLoadError> {
    items.get(index).ok_or_else(|| SceneLoadError::IndexOutOfRange {
        object: object.name.clone(),
        face,
        kind,
        index,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::Material;
    use assert2::{assert, let_assert};

    const TWO_TRIANGLES: &str = "\
o Plane
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
usemtl floor
f 1//1 2//1 3//1
f 1 3 4
";

    fn parse(obj: &str) -> Object {
        let_assert!(Ok(set) = wavefront_obj::obj::parse(obj));
        let_assert!(Some(object) = set.objects.into_iter().next());
        object
    }

    fn floor_table() -> MaterialTable {
        MaterialTable::new(vec![
            Material::new("wall", [1.0, 1.0, 1.0]),
            Material::new("floor", [0.5, 0.5, 0.5]),
        ])
    }

    #[test]
    fn faces_with_and_without_normals() {
        let object = parse(TWO_TRIANGLES);
        let_assert!(
            Ok(faces) = load_faces(&object, &floor_table(), MissingMaterialPolicy::Sentinel)
        );

        assert!(faces.len() == 2);
        assert!(faces[0].index == 0);
        assert!(faces[1].index == 1);
        assert!(faces.iter().all(|f| f.material == Some(1)));

        assert!(faces[0].positions[1].xyz() == [1.0, 0.0, 0.0]);
        assert!(faces[0].normals[0].xyz() == [0.0, 0.0, 1.0]);
        assert!(faces[0].face_normal.xyz() == [0.0, 0.0, 1.0]);

        // No normals given, falls back to the face normal
        assert!(faces[1].normals.iter().all(|n| *n == faces[1].face_normal));
    }

    #[test]
    fn vertices_keep_file_order() {
        let object = parse(
            "\
o Quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vn 1.0 0.0 0.0
vn 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//2 3//3
f 1//3 3//1 4//2
",
        );
        let_assert!(
            Ok(faces) = load_faces(&object, &floor_table(), MissingMaterialPolicy::Sentinel)
        );
        assert!(faces.len() == 2);

        let positions = |f: &Face| f.positions.map(|p| p.xyz());
        let normals = |f: &Face| f.normals.map(|n| n.xyz());

        let origin = [0.0, 0.0, 0.0];
        let (x, y, z) = ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(positions(&faces[0]) == Triangle::new(origin, [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]));
        assert!(normals(&faces[0]) == Triangle::new(x, y, z));
        assert!(positions(&faces[1]) == Triangle::new(origin, [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]));
        assert!(normals(&faces[1]) == Triangle::new(z, x, y));
        assert!(faces.iter().all(|f| f.face_normal.xyz() == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn unknown_material_sentinel() {
        let object = parse(TWO_TRIANGLES);
        let table = MaterialTable::new(vec![Material::new("wall", [1.0, 1.0, 1.0])]);
        let_assert!(Ok(faces) = load_faces(&object, &table, MissingMaterialPolicy::Sentinel));
        assert!(faces.iter().all(|f| f.material.is_none()));
    }

    #[test]
    fn unknown_material_fail() {
        let object = parse(TWO_TRIANGLES);
        let table = MaterialTable::default();
        let_assert!(
            Err(SceneLoadError::UnknownMaterial { object, material }) =
                load_faces(&object, &table, MissingMaterialPolicy::Fail)
        );
        assert!(object == "Plane");
        assert!(material == "floor");
    }

    #[test]
    fn non_triangles_are_skipped() {
        let object = parse(
            "\
o Wire
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
l 1 2
f 1 2 3
",
        );
        let_assert!(
            Ok(faces) = load_faces(&object, &floor_table(), MissingMaterialPolicy::Sentinel)
        );
        assert!(faces.len() == 1);
        assert!(faces[0].material.is_none());
    }
}
