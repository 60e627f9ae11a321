mod aabb;
mod matrix;
mod triangle;
mod vector;

pub use aabb::AABB;
pub use matrix::Matrix4x4;
pub use triangle::Triangle;
pub use vector::Vector4;

#[cfg(test)]
pub use matrix::test as matrix_test;

pub type FloatType = f32;

pub type WorldBox = AABB<Vector4>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}
