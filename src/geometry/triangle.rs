use std::ops::{Index, IndexMut};

use super::{Axis, FloatType, Vector4};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> IndexMut<usize> for Triangle<Point> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Triangle<Vector4> {
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [Vector4; 2] {
        [self[1].sub(&self[0]), self[2].sub(&self[0])]
    }

    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> Vector4 {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    /// Unit normal as a direction (`w == 0`). NaN for degenerate triangles.
    pub fn unit_normal(&self) -> Vector4 {
        self.normal().normalize().with_w(0.0)
    }

    /// Mean of the vertex coordinates along one axis.
    pub fn centroid_along(&self, axis: Axis) -> FloatType {
        self.iter().map(|p| p.get(axis)).sum::<FloatType>() / 3.0
    }
}
