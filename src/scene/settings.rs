use bon::bon;

use crate::geometry::{FloatType, Vector4};

/// Smallest extent of a bounding volume along any axis.
pub const DEFAULT_BV_MIN_DELTA: FloatType = 0.01;

/// What to do with faces whose material is not in the material library.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissingMaterialPolicy {
    /// Keep the face, marked as having no material
    #[default]
    Sentinel,
    /// Refuse to load the scene
    Fail,
}

#[derive(Clone, Debug)]
pub struct SceneSettings {
    pub bv_min_delta: FloatType,
    pub missing_materials: MissingMaterialPolicy,
    /// Camera position relative to its parent frame
    pub camera_offset: Vector4,
}

#[bon]
impl SceneSettings {
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_BV_MIN_DELTA)] bv_min_delta: FloatType,
        #[builder(default)] missing_materials: MissingMaterialPolicy,
        #[builder(default = Vector4::point(0.0, -10.0, 2.0))] camera_offset: Vector4,
    ) -> Self {
        assert!(bv_min_delta > 0.0);

        SceneSettings {
            bv_min_delta,
            missing_materials,
            camera_offset,
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings::builder().build()
    }
}
