//! Flat float records in the texel layouts the ray tracing shader samples.
//!
//! Indices are stored as `index + 0.5` so that the shader can truncate them to
//! integers safely. Missing indices are stored as `-1 + 0.5`.

use bytemuck::{Pod, Zeroable};

use crate::{
    geometry::{FloatType, Triangle, Vector4},
    scene::{BvNode, Bvh, Face, Material, Scene},
};

const INDEX_OFFSET: FloatType = 0.5;
const MISSING_INDEX: FloatType = -1.0 + INDEX_OFFSET;

/// Name and texture unit of a sampler uniform in the shader.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SamplerBinding {
    pub name: &'static str,
    pub unit: u32,
}

pub const FACE_SAMPLER: SamplerBinding = SamplerBinding {
    name: "u_face_sampler",
    unit: 3,
};
pub const AABB_SAMPLER: SamplerBinding = SamplerBinding {
    name: "u_aabb_sampler",
    unit: 4,
};
pub const MATERIAL_SAMPLER: SamplerBinding = SamplerBinding {
    name: "u_mtl_sampler",
    unit: 5,
};

/// Fixed texel shape of a record type.
pub trait Record: Pod {
    const TEXELS: usize;
    const CHANNELS: usize;
    const FLOATS: usize = Self::TEXELS * Self::CHANNELS;
}

/// 8 RGB texels: face normal, 3 positions, 3 normals, material.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FaceRecord {
    pub face_normal: [FloatType; 3],
    pub positions: [[FloatType; 3]; 3],
    pub normals: [[FloatType; 3]; 3],
    /// Material index with offset, then two unused channels
    pub material: [FloatType; 3],
}

impl Record for FaceRecord {
    const TEXELS: usize = 8;
    const CHANNELS: usize = 3;
}

/// 3 RGBA texels: box min, box max, links.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BvNodeRecord {
    pub min: [FloatType; 4],
    pub max: [FloatType; 4],
    /// Left child, right child, first face, second face
    pub links: [FloatType; 4],
}

impl Record for BvNodeRecord {
    const TEXELS: usize = 3;
    const CHANNELS: usize = 4;
}

/// 2 RGBA texels: albedo, class parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialRecord {
    pub albedo: [FloatType; 4],
    /// Class tag with offset, reflection ratio, reflection gloss, refraction index
    pub properties: [FloatType; 4],
}

impl Record for MaterialRecord {
    const TEXELS: usize = 2;
    const CHANNELS: usize = 4;
}

const _: () = assert!(size_of::<FaceRecord>() == FaceRecord::FLOATS * size_of::<FloatType>());
const _: () = assert!(size_of::<BvNodeRecord>() == BvNodeRecord::FLOATS * size_of::<FloatType>());
const _: () =
    assert!(size_of::<MaterialRecord>() == MaterialRecord::FLOATS * size_of::<FloatType>());

fn pack_index(index: Option<usize>) -> FloatType {
    index.map_or(MISSING_INDEX, |i| i as FloatType + INDEX_OFFSET)
}

fn rgba(v: &Vector4) -> [FloatType; 4] {
    let [x, y, z] = v.xyz();
    [x, y, z, 1.0]
}

fn xyz3(t: &Triangle<Vector4>) -> [[FloatType; 3]; 3] {
    [t[0].xyz(), t[1].xyz(), t[2].xyz()]
}

impl From<&Face> for FaceRecord {
    fn from(face: &Face) -> Self {
        FaceRecord {
            face_normal: face.face_normal.xyz(),
            positions: xyz3(&face.positions),
            normals: xyz3(&face.normals),
            material: [pack_index(face.material), 0.0, 0.0],
        }
    }
}

impl From<&BvNode> for BvNodeRecord {
    fn from(node: &BvNode) -> Self {
        BvNodeRecord {
            min: rgba(&node.bounds.min),
            max: rgba(&node.bounds.max),
            links: [
                pack_index(node.left.map(|i| i.index())),
                pack_index(node.right.map(|i| i.index())),
                pack_index(node.faces.first().copied()),
                pack_index(node.faces.get(1).copied()),
            ],
        }
    }
}

impl From<&Material> for MaterialRecord {
    fn from(material: &Material) -> Self {
        let class = &material.class;
        MaterialRecord {
            albedo: rgba(&material.albedo),
            properties: [
                class.tag() as FloatType + INDEX_OFFSET,
                class.reflection_ratio(),
                class.reflection_gloss(),
                class.refraction_index(),
            ],
        }
    }
}

pub fn pack_faces(faces: &[Face]) -> Vec<FaceRecord> {
    faces.iter().map(FaceRecord::from).collect()
}

pub fn pack_bvh(bvh: &Bvh) -> Vec<BvNodeRecord> {
    bvh.nodes().iter().map(BvNodeRecord::from).collect()
}

pub fn pack_materials(materials: &[Material]) -> Vec<MaterialRecord> {
    materials.iter().map(MaterialRecord::from).collect()
}

pub fn as_floats<R: Record>(records: &[R]) -> &[FloatType] {
    bytemuck::cast_slice(records)
}

/// A stack of 2D textures, one record per row.
///
/// Layers shorter than `rows` are zero filled.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSlices {
    pub texels_per_record: usize,
    pub channels: usize,
    pub rows: usize,
    pub layers: usize,
    pub data: Vec<FloatType>,
}

impl TextureSlices {
    pub fn layered<R: Record>(layers: &[Vec<R>]) -> TextureSlices {
        let rows = layers.iter().map(Vec::len).max().unwrap_or(0);
        let layer_floats = rows * R::FLOATS;

        let mut data = vec![0.0; layer_floats * layers.len()];
        for (layer, records) in data.chunks_exact_mut(layer_floats.max(1)).zip(layers) {
            let floats = as_floats(records);
            layer[..floats.len()].copy_from_slice(floats);
        }

        TextureSlices {
            texels_per_record: R::TEXELS,
            channels: R::CHANNELS,
            rows,
            layers: layers.len(),
            data,
        }
    }

    pub fn single<R: Record>(records: Vec<R>) -> TextureSlices {
        Self::layered(&[records])
    }

    /// Texture width in texels.
    pub fn width(&self) -> usize {
        self.texels_per_record
    }

    pub fn floats_per_record(&self) -> usize {
        self.texels_per_record * self.channels
    }

    /// Record `row` of `layer`, as floats.
    pub fn record(&self, layer: usize, row: usize) -> &[FloatType] {
        let stride = self.floats_per_record();
        let start = (layer * self.rows + row) * stride;
        &self.data[start..start + stride]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// All textures of a scene, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedScene {
    /// One layer per object
    pub faces: TextureSlices,
    /// One layer per object
    pub bvh: TextureSlices,
    pub materials: TextureSlices,
}

impl PackedScene {
    #[tracing::instrument(skip_all)]
    pub fn new(scene: &Scene) -> PackedScene {
        let faces: Vec<_> = scene.objects.iter().map(|o| pack_faces(&o.faces)).collect();
        let bvh: Vec<_> = scene.objects.iter().map(|o| pack_bvh(&o.bvh)).collect();

        let packed = PackedScene {
            faces: TextureSlices::layered(&faces),
            bvh: TextureSlices::layered(&bvh),
            materials: TextureSlices::single(pack_materials(&scene.materials)),
        };
        tracing::info!(
            face_rows = packed.faces.rows,
            bvh_rows = packed.bvh.rows,
            layers = packed.faces.layers,
            materials = packed.materials.rows,
            "Packed scene"
        );
        packed
    }

    pub fn bindings(&self) -> [(SamplerBinding, &TextureSlices); 3] {
        [
            (FACE_SAMPLER, &self.faces),
            (AABB_SAMPLER, &self.bvh),
            (MATERIAL_SAMPLER, &self.materials),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::{MaterialClass, SceneSettings};
    use assert2::{assert, let_assert};

    fn face(material: Option<usize>) -> Face {
        Face::new(
            Triangle::new(
                Vector4::point(0.0, 0.0, 0.0),
                Vector4::point(1.0, 0.0, 0.0),
                Vector4::point(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                Vector4::direction(0.0, 0.0, 1.0),
                Vector4::direction(0.0, 1.0, 0.0),
                Vector4::direction(1.0, 0.0, 0.0),
            ),
            0,
            material,
        )
    }

    #[test]
    fn face_layout() {
        let record = FaceRecord::from(&face(Some(2)));
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 1.0,
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
            2.5, 0.0, 0.0,
        ];
        assert!(as_floats(&[record]) == expected);
    }

    #[test]
    fn face_without_material() {
        let record = FaceRecord::from(&face(None));
        assert!(record.material == [-0.5, 0.0, 0.0]);
    }

    #[test]
    fn bvh_layout() {
        let faces: Vec<_> = (0..3)
            .map(|i| {
                let x = 2.0 * i as FloatType;
                Face::flat(
                    Triangle::new(
                        Vector4::point(x, 0.0, 0.0),
                        Vector4::point(x + 1.0, 0.0, 0.0),
                        Vector4::point(x, 1.0, 0.0),
                    ),
                    i,
                    None,
                )
            })
            .collect();
        let bvh = Bvh::build(&faces, 0.01);
        let records = pack_bvh(&bvh);

        assert!(records.len() == 3);
        assert!(records[0].min == [0.0, 0.0, 0.0, 1.0]);
        assert!(records[0].max == [5.0, 1.0, 0.01, 1.0]);
        assert!(records[0].links == [1.5, 2.5, -0.5, -0.5]);
        assert!(records[1].links == [-0.5, -0.5, 0.5, -0.5]);
        assert!(records[2].links == [-0.5, -0.5, 1.5, 2.5]);
        assert!(as_floats(&records).len() == 36);
    }

    #[test]
    fn material_layout() {
        let material = Material {
            name: "water".to_owned(),
            albedo: Vector4::point(0.1, 0.2, 0.3),
            class: MaterialClass::Dielectric {
                refraction_index: 1.33,
            },
        };
        let record = MaterialRecord::from(&material);
        assert!(as_floats(&[record]) == [0.1, 0.2, 0.3, 1.0, 2.5, 0.0, 1.0, 1.33]);

        let light = MaterialRecord::from(&Material::new("light", [0.0, 0.0, 0.0]));
        assert!(light.albedo == [3.0, 3.0, 3.0, 1.0]);
        assert!(light.properties[0] == 0.5);
    }

    #[test]
    fn layers_are_zero_filled() {
        let layers = vec![
            pack_faces(&[face(Some(0))]),
            pack_faces(&[face(Some(1)), face(Some(2)), face(None)]),
        ];
        let slices = TextureSlices::layered(&layers);

        assert!(slices.rows == 3);
        assert!(slices.layers == 2);
        assert!(slices.width() == 8);
        assert!(slices.channels == 3);
        assert!(slices.data.len() == 3 * 2 * 24);

        assert!(slices.record(0, 0)[21] == 0.5);
        assert!(slices.record(0, 1).iter().all(|&x| x == 0.0));
        assert!(slices.record(0, 2).iter().all(|&x| x == 0.0));
        assert!(slices.record(1, 1)[21] == 2.5);
        assert!(slices.record(1, 2)[21] == -0.5);
        assert!(slices.as_bytes().len() == slices.data.len() * 4);
    }

    #[test]
    fn empty_layers() {
        let slices = TextureSlices::layered::<MaterialRecord>(&[Vec::new(), Vec::new()]);
        assert!(slices.rows == 0);
        assert!(slices.layers == 2);
        assert!(slices.data.is_empty());
    }

    #[test]
    fn packed_fixture() {
        let_assert!(
            Ok(scene) = Scene::parse(
                include_str!("../data/cornell.obj"),
                include_str!("../data/cornell.mtl"),
                &SceneSettings::default()
            )
        );
        let packed = PackedScene::new(&scene);

        assert!(packed.faces.layers == 3);
        assert!(packed.faces.rows == 4);
        assert!(packed.bvh.layers == 3);
        assert!(packed.bvh.rows == 3);
        assert!(packed.materials.layers == 1);
        assert!(packed.materials.rows == 3);

        let names: Vec<_> = packed.bindings().iter().map(|(b, _)| b.name).collect();
        assert!(names == ["u_face_sampler", "u_aabb_sampler", "u_mtl_sampler"]);
        assert!(packed.bindings()[2].0.unit == 5);
    }
}
