use std::fmt::{self, Display, Write};

use crate::util::Stats;

use super::{Bvh, NodeIdx};

/// Shape summary of a built hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Depth of each leaf, counting the root as 1
    pub leaf_depth: Stats,
    /// Number of faces in each leaf
    pub leaf_fill: Stats,
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes: {} ({} leaves)", self.node_count, self.leaf_count)?;
        writeln!(f, "Leaf depth: {}", self.leaf_depth)?;
        write!(f, "Leaf fill: {}", self.leaf_fill)
    }
}

impl Bvh {
    pub fn print_tree(&self) {
        let mut out = String::new();
        // Writing to a String never fails
        let _ = self.write_tree(&mut out);
        print!("{out}");
    }

    /// Writes one line per node, indented by depth.
    pub fn write_tree(&self, out: &mut impl Write) -> fmt::Result {
        self.write_recursive(out, 0, self.root_idx())
    }

    pub fn statistics(&self) -> BvhStatistics {
        let mut leaf_depth = Stats::default();
        let mut leaf_fill = Stats::default();

        let mut stack = vec![(self.root_idx(), 1)];
        while let Some((idx, depth)) = stack.pop() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                leaf_depth.add_sample(depth);
                leaf_fill.add_sample(node.faces.len());
            }
            stack.extend(node.children().map(|child| (child, depth + 1)));
        }

        BvhStatistics {
            node_count: self.len(),
            leaf_count: leaf_fill.count,
            leaf_depth,
            leaf_fill,
        }
    }

    fn write_recursive(&self, out: &mut impl Write, indent: usize, idx: NodeIdx) -> fmt::Result {
        let node = &self.nodes[idx];
        write!(
            out,
            "{}- {}{}: {}-{}",
            "  ".repeat(indent),
            if node.is_leaf() { "L" } else { "I" },
            idx.index(),
            node.bounds.min,
            node.bounds.max,
        )?;
        if node.is_leaf() {
            write!(out, " faces {:?}", node.faces.as_slice())?;
        }
        writeln!(out)?;

        for child in node.children() {
            self.write_recursive(out, indent + 1, child)?;
        }
        Ok(())
    }
}
