//! Hierarchical reference frames with lazily cached world transforms.
//!
//! Frames live in an arena owned by [`FrameGraph`] and are addressed by [`FrameId`].
//! Every frame keeps a local matrix (relative to its parent) and a cached model
//! matrix (relative to the world). A cached model matrix is valid only while the
//! valid flag is set; an invalid frame always has only invalid descendants.

mod motion;

use index_vec::IndexVec;
use thiserror::Error;

use crate::geometry::Matrix4x4;

index_vec::define_index_type! {
    pub struct FrameId = u32;
}

#[derive(Clone, Debug)]
struct Frame {
    local: Matrix4x4,
    model: Matrix4x4,
    valid: bool,

    parent: Option<FrameId>,
    first_child: Option<FrameId>,
    next_sibling: Option<FrameId>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error(
        "Cannot rotate frame {frame:?} relative to {relative_to:?}, only self or parent axes are supported"
    )]
    ArbitraryRotationAxis {
        frame: FrameId,
        relative_to: FrameId,
    },

    #[error("Cannot set model matrix of root frame {0:?}")]
    RootModelMatrix(FrameId),
}

#[derive(Clone, Debug, Default)]
pub struct FrameGraph {
    frames: IndexVec<FrameId, Frame>,
    recompute_count: usize,
}

impl FrameGraph {
    pub fn new() -> FrameGraph {
        Default::default()
    }

    /// Adds a frame without parent. Its model matrix is its local matrix.
    pub fn add_root(&mut self) -> FrameId {
        self.frames.push(Frame {
            local: Matrix4x4::identity(),
            model: Matrix4x4::identity(),
            valid: true,
            parent: None,
            first_child: None,
            next_sibling: None,
        })
    }

    /// Adds a frame as the new first child of `parent`.
    pub fn add_child(&mut self, parent: FrameId) -> FrameId {
        let next_sibling = self.frames[parent].first_child;
        let id = self.frames.push(Frame {
            local: Matrix4x4::identity(),
            model: Matrix4x4::identity(),
            valid: false,
            parent: Some(parent),
            first_child: None,
            next_sibling,
        });
        self.frames[parent].first_child = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frames[id].parent
    }

    /// Children of the frame, most recently added first.
    pub fn children(&self, id: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        std::iter::successors(self.frames[id].first_child, |child| {
            self.frames[*child].next_sibling
        })
    }

    /// Whether the cached model matrix of the frame is current.
    pub fn is_valid(&self, id: FrameId) -> bool {
        self.frames[id].valid
    }

    /// Number of model matrix recomputations done so far.
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    pub fn local_matrix(&self, id: FrameId) -> Matrix4x4 {
        self.frames[id].local
    }

    pub fn set_local_matrix(&mut self, id: FrameId, matrix: Matrix4x4) {
        self.frames[id].local = matrix;
        self.invalidate_subtree(id);
    }

    /// Transform of the frame relative to the world.
    ///
    /// Recomputes only the invalid part of the ancestor chain.
    pub fn model_matrix(&mut self, id: FrameId) -> Matrix4x4 {
        self.validate_ascending(id);
        self.frames[id].model
    }

    /// Back-solves the local matrix so that the frame ends up with the given model matrix.
    /// The parent model matrix must be rigid.
    pub fn set_model_matrix(&mut self, id: FrameId, matrix: Matrix4x4) -> Result<(), FrameError> {
        let parent = self.frames[id]
            .parent
            .ok_or(FrameError::RootModelMatrix(id))?;
        let parent_model = self.model_matrix(parent);
        self.set_local_matrix(id, matrix.mul(&parent_model.rigid_inverse()));
        Ok(())
    }

    fn invalidate_subtree(&mut self, id: FrameId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let frame = &mut self.frames[id];
            if !frame.valid {
                continue;
            }
            frame.valid = false;
            stack.extend(self.children(id));
        }
    }

    fn validate_ascending(&mut self, id: FrameId) {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = &self.frames[id];
            if frame.valid {
                break;
            }
            chain.push(id);
            current = frame.parent;
        }

        for id in chain.into_iter().rev() {
            let frame = &self.frames[id];
            let model = match frame.parent {
                Some(parent) => frame.local.mul(&self.frames[parent].model),
                None => frame.local,
            };

            let frame = &mut self.frames[id];
            frame.model = model;
            frame.valid = true;
            self.recompute_count += 1;
        }
    }
}
