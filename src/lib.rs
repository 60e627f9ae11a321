pub mod frame;
pub mod geometry;
pub mod packing;
pub mod scene;
mod util;

pub use frame::{FrameError, FrameGraph, FrameId};
pub use packing::PackedScene;
pub use scene::{MissingMaterialPolicy, Scene, SceneLoadError, SceneSettings};
