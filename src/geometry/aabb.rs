use super::{Axis, FloatType, Vector4};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl AABB<Vector4> {
    /// Smallest box containing all the points, `None` if there are no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vector4>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => AABB::new(*p, *p),
                Some(b) => AABB::new(b.min.inf(p), b.max.sup(p)),
            })
        })
    }

    /// Grows the max corner on every axis thinner than `min_delta`, so that the box
    /// never degenerates into a plane.
    pub fn padded(&self, min_delta: FloatType) -> Self {
        let mut max = self.max.xyz();
        for axis in Axis::ALL {
            if self.extent(axis) < min_delta {
                max[axis.index()] += min_delta;
            }
        }
        AABB::new(self.min, Vector4::from_xyz(max))
    }

    pub fn union(&self, other: &Self) -> Self {
        AABB::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    pub fn extent(&self, axis: Axis) -> FloatType {
        (self.max.get(axis) - self.min.get(axis)).abs()
    }

    /// Axis with the largest extent; ties go to x, then y.
    pub fn longest_axis(&self) -> Axis {
        Axis::ALL
            .into_iter()
            .reduce(|best, axis| {
                if self.extent(axis) > self.extent(best) {
                    axis
                } else {
                    best
                }
            })
            .unwrap_or(Axis::X)
    }

    pub fn center(&self) -> Vector4 {
        self.min.add(&self.max).scale(0.5)
    }

    pub fn contains_point(&self, p: &Vector4) -> bool {
        Axis::ALL
            .into_iter()
            .all(|axis| self.min.get(axis) <= p.get(axis) && p.get(axis) <= self.max.get(axis))
    }

    pub fn contains(&self, other: &AABB<Vector4>) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }
}
