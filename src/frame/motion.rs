use crate::geometry::{FloatType, Matrix4x4, Vector4};

use super::{FrameError, FrameGraph, FrameId};

impl FrameGraph {
    /// Moves the frame by `v`, given in the axes of `relative_to`.
    ///
    /// `None` or the frame itself moves along the frame's own axes. A root has `v`
    /// mapped through it even when it is the parent. A non-root parent moves along
    /// the parent axes, any other frame has `v` mapped through it first.
    pub fn translate(&mut self, id: FrameId, v: &Vector4, relative_to: Option<FrameId>) {
        let direction = Vector4::direction(v.x(), v.y(), v.z());
        let parent = self.frames[id].parent;

        let offset = match relative_to {
            None => direction.transform(&self.frames[id].local),
            Some(r) if r == id => direction.transform(&self.frames[id].local),
            Some(r) => match parent {
                Some(parent) if r == parent && self.frames[r].parent.is_some() => direction,
                Some(parent) => self.map_pos(r, &direction, parent),
                // Parent space of a root is the world
                None => direction.transform(&self.model_matrix(r)),
            },
        };

        self.frames[id].local.add_translation(&offset);
        self.invalidate_subtree(id);
    }

    pub fn rotate_x(
        &mut self,
        id: FrameId,
        theta: FloatType,
        relative_to: Option<FrameId>,
    ) -> Result<(), FrameError> {
        self.rotate(id, Matrix4x4::rotation_x(theta), relative_to)
    }

    pub fn rotate_y(
        &mut self,
        id: FrameId,
        theta: FloatType,
        relative_to: Option<FrameId>,
    ) -> Result<(), FrameError> {
        self.rotate(id, Matrix4x4::rotation_y(theta), relative_to)
    }

    pub fn rotate_z(
        &mut self,
        id: FrameId,
        theta: FloatType,
        relative_to: Option<FrameId>,
    ) -> Result<(), FrameError> {
        self.rotate(id, Matrix4x4::rotation_z(theta), relative_to)
    }

    fn rotate(
        &mut self,
        id: FrameId,
        rotation: Matrix4x4,
        relative_to: Option<FrameId>,
    ) -> Result<(), FrameError> {
        let frame = &self.frames[id];
        let local = match relative_to {
            None => rotation.mul(&frame.local),
            Some(r) if r == id => rotation.mul(&frame.local),
            Some(r) if Some(r) == frame.parent => frame.local.mul(&rotation),
            Some(r) => {
                return Err(FrameError::ArbitraryRotationAxis {
                    frame: id,
                    relative_to: r,
                });
            }
        };
        self.set_local_matrix(id, local);
        Ok(())
    }

    /// Re-expresses `v`, given in the space of frame `id`, in the space of `target`.
    ///
    /// Roots are treated as the world space.
    pub fn map_pos(&mut self, id: FrameId, v: &Vector4, target: FrameId) -> Vector4 {
        if Some(target) == self.frames[id].parent {
            return v.transform(&self.frames[id].local);
        }

        let model = self.model_matrix(id);
        if self.frames[target].parent.is_none() {
            v.transform(&model)
        } else {
            let target_inverse = self.model_matrix(target).rigid_inverse();
            v.transform(&model).transform(&target_inverse)
        }
    }
}
