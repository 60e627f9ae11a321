use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

use nalgebra::{RowVector4, Vector3};

use super::{Axis, FloatType, Matrix4x4};

/// Four component row vector.
///
/// `w == 1` marks a position, `w == 0` a direction. Arithmetic only looks at the
/// x, y, z triple; everything except the matrix product produces a vector with
/// `w == 1`, regardless of what the operands were.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector4(pub(crate) RowVector4<FloatType>);

impl Vector4 {
    pub fn new(x: FloatType, y: FloatType, z: FloatType, w: FloatType) -> Vector4 {
        Vector4(RowVector4::new(x, y, z, w))
    }

    pub fn point(x: FloatType, y: FloatType, z: FloatType) -> Vector4 {
        Self::new(x, y, z, 1.0)
    }

    pub fn direction(x: FloatType, y: FloatType, z: FloatType) -> Vector4 {
        Self::new(x, y, z, 0.0)
    }

    pub fn from_xyz(xyz: [FloatType; 3]) -> Vector4 {
        Self::point(xyz[0], xyz[1], xyz[2])
    }

    pub fn x(&self) -> FloatType {
        self.0[0]
    }

    pub fn y(&self) -> FloatType {
        self.0[1]
    }

    pub fn z(&self) -> FloatType {
        self.0[2]
    }

    pub fn w(&self) -> FloatType {
        self.0[3]
    }

    pub fn get(&self, axis: Axis) -> FloatType {
        self.0[axis.index()]
    }

    pub fn xyz(&self) -> [FloatType; 3] {
        [self.x(), self.y(), self.z()]
    }

    /// Same as `xyz`, for vectors holding a color.
    pub fn rgb(&self) -> [FloatType; 3] {
        self.xyz()
    }

    pub fn xyzw(&self) -> [FloatType; 4] {
        [self.x(), self.y(), self.z(), self.w()]
    }

    pub fn with_w(mut self, w: FloatType) -> Vector4 {
        self.0[3] = w;
        self
    }

    fn from_vector3(v: Vector3<FloatType>) -> Vector4 {
        Self::point(v.x, v.y, v.z)
    }

    fn as_vector3(&self) -> Vector3<FloatType> {
        Vector3::new(self.x(), self.y(), self.z())
    }

    pub fn add(&self, rhs: &Vector4) -> Vector4 {
        Self::from_vector3(self.as_vector3() + rhs.as_vector3())
    }

    pub fn sub(&self, rhs: &Vector4) -> Vector4 {
        Self::from_vector3(self.as_vector3() - rhs.as_vector3())
    }

    pub fn neg(&self) -> Vector4 {
        Self::from_vector3(-self.as_vector3())
    }

    pub fn scale(&self, s: FloatType) -> Vector4 {
        Self::from_vector3(self.as_vector3() * s)
    }

    pub fn div(&self, s: FloatType) -> Vector4 {
        Self::from_vector3(self.as_vector3() / s)
    }

    /// Row vector times matrix (`v * M`), all four components take part.
    pub fn transform(&self, m: &Matrix4x4) -> Vector4 {
        Vector4(self.0 * m.0)
    }

    pub fn magnitude(&self) -> FloatType {
        self.as_vector3().norm()
    }

    /// Divides x, y, z by the magnitude. A zero vector yields NaNs.
    pub fn normalize(&self) -> Vector4 {
        self.scale(1.0 / self.magnitude())
    }

    pub fn cross(&self, rhs: &Vector4) -> Vector4 {
        Self::from_vector3(self.as_vector3().cross(&rhs.as_vector3()))
    }

    pub fn dot(&self, rhs: &Vector4) -> FloatType {
        self.as_vector3().dot(&rhs.as_vector3())
    }

    /// Componentwise minimum of the x, y, z triple.
    pub fn inf(&self, rhs: &Vector4) -> Vector4 {
        Self::from_vector3(self.as_vector3().inf(&rhs.as_vector3()))
    }

    /// Componentwise maximum of the x, y, z triple.
    pub fn sup(&self, rhs: &Vector4) -> Vector4 {
        Self::from_vector3(self.as_vector3().sup(&rhs.as_vector3()))
    }

    /// Distance between the x, y, z triples.
    pub fn distance(&self, rhs: &Vector4) -> FloatType {
        self.sub(rhs).magnitude()
    }
}

impl Default for Vector4 {
    fn default() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }
}

impl Add for Vector4 {
    type Output = Vector4;

    fn add(self, rhs: Vector4) -> Vector4 {
        Vector4::add(&self, &rhs)
    }
}

impl Sub for Vector4 {
    type Output = Vector4;

    fn sub(self, rhs: Vector4) -> Vector4 {
        Vector4::sub(&self, &rhs)
    }
}

impl Neg for Vector4 {
    type Output = Vector4;

    fn neg(self) -> Vector4 {
        Vector4::neg(&self)
    }
}

impl Mul<FloatType> for Vector4 {
    type Output = Vector4;

    fn mul(self, rhs: FloatType) -> Vector4 {
        self.scale(rhs)
    }
}

impl Mul<&Matrix4x4> for Vector4 {
    type Output = Vector4;

    fn mul(self, rhs: &Matrix4x4) -> Vector4 {
        self.transform(rhs)
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Vector4 {}, {}, {}, {}]",
            self.x(),
            self.y(),
            self.z(),
            self.w()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::PointWrapper;
    use assert2::assert;
    use test_strategy::proptest;

    #[test]
    fn arithmetic_resets_w() {
        let p = Vector4::point(1.0, 2.0, 3.0);
        let d = Vector4::direction(4.0, 5.0, 6.0);

        assert!((p + d).xyzw() == [5.0, 7.0, 9.0, 1.0]);
        assert!((d - p).xyzw() == [3.0, 3.0, 3.0, 1.0]);
        assert!((-d).xyzw() == [-4.0, -5.0, -6.0, 1.0]);
        assert!((d * 2.0).xyzw() == [8.0, 10.0, 12.0, 1.0]);
        assert!(d.div(2.0).xyzw() == [2.0, 2.5, 3.0, 1.0]);
    }

    #[test]
    fn default_is_origin_point() {
        assert!(Vector4::default().xyzw() == [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn cross_of_axes() {
        let x = Vector4::direction(1.0, 0.0, 0.0);
        let y = Vector4::direction(0.0, 1.0, 0.0);
        assert!(x.cross(&y).xyz() == [0.0, 0.0, 1.0]);
        assert!(y.cross(&x).xyz() == [0.0, 0.0, -1.0]);
    }

    #[test]
    fn dot_ignores_w() {
        let a = Vector4::new(1.0, 2.0, 3.0, 10.0);
        let b = Vector4::new(4.0, 5.0, 6.0, 10.0);
        assert!(a.dot(&b) == 32.0);
    }

    #[test]
    fn magnitude_ignores_w() {
        assert!(Vector4::new(3.0, 4.0, 0.0, 7.0).magnitude() == 5.0);
    }

    #[test]
    fn normalize_zero_is_nan() {
        let n = Vector4::direction(0.0, 0.0, 0.0).normalize();
        assert!(n.x().is_nan());
    }

    #[test]
    fn transform_uses_w() {
        let m = Matrix4x4::identity().post_cat_txyz(1.0, 2.0, 3.0);
        let p = Vector4::point(1.0, 1.0, 1.0) * &m;
        let d = Vector4::direction(1.0, 1.0, 1.0) * &m;
        assert!(p.xyzw() == [2.0, 3.0, 4.0, 1.0]);
        assert!(d.xyzw() == [1.0, 1.0, 1.0, 0.0]);
    }

    #[proptest]
    fn normalized_has_unit_length(v: PointWrapper) {
        proptest::prop_assume!(v.magnitude() > 1e-3);
        assert!((v.normalize().magnitude() - 1.0).abs() < 1e-4);
    }

    #[proptest]
    fn cross_is_orthogonal(a: PointWrapper, b: PointWrapper) {
        let c = a.cross(&b);
        let scale = a.magnitude().max(b.magnitude());
        let tolerance = 1e-5 * a.magnitude() * b.magnitude() * scale + 1e-4;
        assert!(c.dot(&a).abs() <= tolerance);
        assert!(c.dot(&b).abs() <= tolerance);
    }
}
