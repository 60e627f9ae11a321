//! Loading of OBJ/MTL scenes into faces, materials and one BVH per object.

pub mod bvh;
mod face;
mod loader;
mod material;
mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools as _;
use thiserror::Error;

use crate::{
    frame::{FrameGraph, FrameId},
    geometry::Matrix4x4,
};

pub use bvh::{BvNode, Bvh};
pub use face::Face;
pub use material::{Material, MaterialClass, MaterialTable};
pub use settings::{DEFAULT_BV_MIN_DELTA, MissingMaterialPolicy, SceneSettings};

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse OBJ file: {0}")]
    ObjParseError(#[source] wavefront_obj::ParseError),

    #[error("Failed to parse MTL file: {0}")]
    MtlParseError(#[source] wavefront_obj::ParseError),

    #[error("Object {object:?}, face {face}: {kind} index {index} out of range")]
    IndexOutOfRange {
        object: String,
        face: usize,
        kind: &'static str,
        index: usize,
    },

    #[error("Object {object:?} uses unknown material {material:?}")]
    UnknownMaterial { object: String, material: String },
}

/// One named object of the mesh with its own hierarchy.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub faces: Vec<Face>,
    pub bvh: Bvh,
}

/// Everything the renderer needs: geometry, materials and the camera rig.
///
/// The camera hangs off a parent frame, which hangs off the world root. Moving or
/// rotating the parent swings the camera around with it.
#[derive(Clone, Debug)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub materials: Vec<Material>,
    pub frames: FrameGraph,
    pub root: FrameId,
    pub camera_parent: FrameId,
    pub camera: FrameId,
}

impl Scene {
    pub fn with_files(
        obj_path: impl AsRef<Path>,
        mtl_path: impl AsRef<Path>,
        settings: &SceneSettings,
    ) -> Result<Scene, SceneLoadError> {
        let obj = read(obj_path.as_ref())?;
        let mtl = read(mtl_path.as_ref())?;
        Self::parse(&obj, &mtl, settings)
    }

    #[tracing::instrument(skip_all)]
    pub fn parse(obj: &str, mtl: &str, settings: &SceneSettings) -> Result<Scene, SceneLoadError> {
        let mtl = wavefront_obj::mtl::parse(mtl).map_err(SceneLoadError::MtlParseError)?;
        let materials = MaterialTable::from_mtl(&mtl);
        tracing::debug!(materials = %materials.names().join(", "), "Loaded materials");

        let obj = wavefront_obj::obj::parse(obj).map_err(SceneLoadError::ObjParseError)?;
        let objects = obj
            .objects
            .iter()
            .map(|object| {
                let faces = loader::load_faces(object, &materials, settings.missing_materials)?;
                let bvh = Bvh::build(&faces, settings.bv_min_delta);
                Ok(SceneObject {
                    name: object.name.clone(),
                    faces,
                    bvh,
                })
            })
            .collect::<Result<Vec<_>, SceneLoadError>>()?;

        let mut frames = FrameGraph::new();
        let root = frames.add_root();
        let camera_parent = frames.add_child(root);
        let camera = frames.add_child(camera_parent);
        frames.translate(camera, &settings.camera_offset, None);

        let scene = Scene {
            objects,
            materials: materials.into_materials(),
            frames,
            root,
            camera_parent,
            camera,
        };
        tracing::info!(
            objects = scene.objects.len(),
            faces = scene.face_count(),
            materials = scene.materials.len(),
            "Scene loaded"
        );
        Ok(scene)
    }

    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }

    /// World transform of the camera.
    pub fn camera_matrix(&mut self) -> Matrix4x4 {
        self.frames.model_matrix(self.camera)
    }
}

fn read(path: &Path) -> Result<String, SceneLoadError> {
    fs::read_to_string(path).map_err(|source| SceneLoadError::ReadError {
        path: path.to_owned(),
        source,
    })
}
