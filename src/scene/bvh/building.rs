use index_vec::IndexVec;
use ordered_float::OrderedFloat;

use crate::{
    geometry::{FloatType, WorldBox},
    scene::Face,
};

use super::{BvNode, Bvh, LEAF_FACES, NodeIdx};

impl Bvh {
    /// Builds the hierarchy by recursive median splits along the longest axis
    /// of each node's box.
    ///
    /// Every box is grown to at least `min_delta` along each axis. Leaves hold
    /// at most [`LEAF_FACES`] faces, referenced by [`Face::index`].
    #[tracing::instrument(skip_all, fields(face_count = faces.len()))]
    pub fn build(faces: &[Face], min_delta: FloatType) -> Bvh {
        let mut bvh = Bvh {
            nodes: IndexVec::new(),
        };

        let mut faces: Vec<&Face> = faces.iter().collect();
        let root = bvh
            .push_node(&faces, min_delta)
            .unwrap_or_else(|| bvh.nodes.push(BvNode::new(WorldBox::default())));
        bvh.build_recursive(root, &mut faces, min_delta);
        bvh.enclose_children();

        tracing::debug!(node_count = bvh.len(), depth = bvh.depth(), "Built BVH");
        bvh
    }

    fn build_recursive(&mut self, node: NodeIdx, faces: &mut [&Face], min_delta: FloatType) {
        if faces.len() <= LEAF_FACES {
            self.nodes[node].faces.extend(faces.iter().map(|f| f.index));
            return;
        }

        let axis = self.nodes[node].bounds.longest_axis();
        faces.sort_by_cached_key(|f| OrderedFloat(f.positions.centroid_along(axis)));
        let (left_faces, right_faces) = faces.split_at_mut(faces.len() / 2);

        // Both children are appended before either subtree
        let left = self.push_node(left_faces, min_delta);
        let right = self.push_node(right_faces, min_delta);
        self.nodes[node].left = left;
        self.nodes[node].right = right;

        if let Some(left) = left {
            self.build_recursive(left, left_faces, min_delta);
        }
        if let Some(right) = right {
            self.build_recursive(right, right_faces, min_delta);
        }
    }

    /// Grows every inner box to cover the padded boxes of its children.
    fn enclose_children(&mut self) {
        // Children always come after their parent
        for idx in self.nodes.indices().rev() {
            let node = &self.nodes[idx];
            let mut bounds = node.bounds;
            for child in node.children() {
                bounds = bounds.union(&self.nodes[child].bounds);
            }
            self.nodes[idx].bounds = bounds;
        }
    }

    /// Appends a node bounding the faces, `None` if there are no faces.
    fn push_node(&mut self, faces: &[&Face], min_delta: FloatType) -> Option<NodeIdx> {
        let bounds = WorldBox::from_points(faces.iter().flat_map(|f| f.vertices()))?;
        Some(self.nodes.push(BvNode::new(bounds.padded(min_delta))))
    }
}
