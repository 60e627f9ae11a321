mod building;
mod printing;

use arrayvec::ArrayVec;
use index_vec::IndexVec;

use crate::geometry::WorldBox;

pub use crate::util::Stats;
pub use printing::BvhStatistics;

/// Largest number of faces a leaf holds.
pub const LEAF_FACES: usize = 2;

index_vec::define_index_type! {
    pub struct NodeIdx = u32;
}

#[derive(Clone, Debug, PartialEq)]
pub struct BvNode {
    pub bounds: WorldBox,
    pub left: Option<NodeIdx>,
    pub right: Option<NodeIdx>,
    /// Face indices, non-empty only in leaves
    pub faces: ArrayVec<usize, LEAF_FACES>,
}

impl BvNode {
    fn new(bounds: WorldBox) -> BvNode {
        BvNode {
            bounds,
            left: None,
            right: None,
            faces: ArrayVec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeIdx> {
        self.left.into_iter().chain(self.right)
    }
}

/// Binary bounding volume hierarchy over the faces of one object.
///
/// Nodes are stored in a flat list, the root comes first and children always
/// come after their parent.
#[derive(Clone, Debug)]
pub struct Bvh {
    nodes: IndexVec<NodeIdx, BvNode>,
}

impl Bvh {
    pub fn root_idx(&self) -> NodeIdx {
        NodeIdx::new(0)
    }

    pub fn root(&self) -> &BvNode {
        &self.nodes[self.root_idx()]
    }

    pub fn node(&self, idx: NodeIdx) -> &BvNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[BvNode] {
        self.nodes.as_raw_slice()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root_idx(), 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.nodes[idx].children().map(|child| (child, depth + 1)));
        }
        max_depth
    }
}
