use indexmap::IndexMap;

use crate::geometry::{FloatType, Vector4};

/// How a surface scatters light, with the parameters relevant to that behaviour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MaterialClass {
    Emissive,
    Reflective {
        /// Fraction of rays reflected rather than scattered
        reflection_ratio: FloatType,
        /// Sharpness of the reflection
        reflection_gloss: FloatType,
    },
    Dielectric {
        refraction_index: FloatType,
    },
}

impl MaterialClass {
    pub const DEFAULT_REFLECTION_RATIO: FloatType = 0.0;
    pub const DEFAULT_REFLECTION_GLOSS: FloatType = 1.0;
    pub const DEFAULT_REFRACTION_INDEX: FloatType = 1.0;

    /// Tag understood by the shader.
    pub fn tag(&self) -> u32 {
        match self {
            MaterialClass::Emissive => 0,
            MaterialClass::Reflective { .. } => 1,
            MaterialClass::Dielectric { .. } => 2,
        }
    }

    pub fn reflection_ratio(&self) -> FloatType {
        match self {
            MaterialClass::Reflective {
                reflection_ratio, ..
            } => *reflection_ratio,
            _ => Self::DEFAULT_REFLECTION_RATIO,
        }
    }

    pub fn reflection_gloss(&self) -> FloatType {
        match self {
            MaterialClass::Reflective {
                reflection_gloss, ..
            } => *reflection_gloss,
            _ => Self::DEFAULT_REFLECTION_GLOSS,
        }
    }

    pub fn refraction_index(&self) -> FloatType {
        match self {
            MaterialClass::Dielectric { refraction_index } => *refraction_index,
            _ => Self::DEFAULT_REFRACTION_INDEX,
        }
    }
}

impl Default for MaterialClass {
    fn default() -> Self {
        MaterialClass::Reflective {
            reflection_ratio: Self::DEFAULT_REFLECTION_RATIO,
            reflection_gloss: Self::DEFAULT_REFLECTION_GLOSS,
        }
    }
}

/// Special treatment for materials recognized by name.
struct MaterialPolicy {
    name: &'static str,
    class: MaterialClass,
    albedo: Option<[FloatType; 3]>,
}

const MATERIAL_POLICIES: &[MaterialPolicy] = &[
    MaterialPolicy {
        name: "light",
        class: MaterialClass::Emissive,
        albedo: Some([3.0, 3.0, 3.0]),
    },
    MaterialPolicy {
        name: "glass",
        class: MaterialClass::Dielectric {
            refraction_index: 1.52,
        },
        albedo: Some([1.0, 1.0, 1.0]),
    },
    MaterialPolicy {
        name: "suzanne",
        class: MaterialClass::Reflective {
            reflection_ratio: 0.5,
            reflection_gloss: 0.7,
        },
        albedo: None,
    },
    MaterialPolicy {
        name: "teapot",
        class: MaterialClass::Reflective {
            reflection_ratio: 0.9,
            reflection_gloss: MaterialClass::DEFAULT_REFLECTION_GLOSS,
        },
        albedo: None,
    },
    MaterialPolicy {
        name: "ladder",
        class: MaterialClass::Reflective {
            reflection_ratio: 0.3,
            reflection_gloss: 0.8,
        },
        albedo: None,
    },
];

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Color in x, y, z
    pub albedo: Vector4,
    pub class: MaterialClass,
}

impl Material {
    /// Creates a material from its diffuse color, applying the overrides for
    /// recognized material names.
    pub fn new(name: impl Into<String>, diffuse: [FloatType; 3]) -> Material {
        let name = name.into();
        let policy = MATERIAL_POLICIES.iter().find(|p| p.name == name);

        Material {
            albedo: Vector4::from_xyz(policy.and_then(|p| p.albedo).unwrap_or(diffuse)),
            class: policy.map(|p| p.class).unwrap_or_default(),
            name,
        }
    }

    pub fn from_mtl(mtl: &wavefront_obj::mtl::Material) -> Material {
        let diffuse = &mtl.color_diffuse;
        Self::new(
            mtl.name.as_str(),
            [
                diffuse.r as FloatType,
                diffuse.g as FloatType,
                diffuse.b as FloatType,
            ],
        )
    }
}

/// Materials in file order, with lookup by name.
///
/// When several materials share a name, the lookup finds the first one.
#[derive(Clone, Debug, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    by_name: IndexMap<String, usize>,
}

impl MaterialTable {
    pub fn new(materials: Vec<Material>) -> MaterialTable {
        let mut by_name = IndexMap::new();
        for (i, material) in materials.iter().enumerate() {
            by_name.entry(material.name.clone()).or_insert(i);
        }
        MaterialTable { materials, by_name }
    }

    pub fn from_mtl(mtl: &wavefront_obj::mtl::MtlSet) -> MaterialTable {
        Self::new(mtl.materials.iter().map(Material::from_mtl).collect())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn into_materials(self) -> Vec<Material> {
        self.materials
    }

    pub fn as_slice(&self) -> &[Material] {
        &self.materials
    }
}
