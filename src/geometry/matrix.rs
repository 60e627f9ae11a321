use std::{fmt, ops::Mul};

use assert2::debug_assert;
use nalgebra::{Matrix3, Matrix4};

use super::{FloatType, Vector4};

/// Largest deviation from orthonormality still accepted as a rigid transform.
const RIGID_TOLERANCE: FloatType = 1e-3;

/// 4x4 matrix in row vector convention.
///
/// Element `(row, col)` addresses the matrix the way it is laid out in row-major
/// order: rows 0 to 2 hold the rotation (the local axes), row 3 holds the translation.
/// Points are transformed as `v * M`, so `A * B` applies `A` first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4(pub(crate) Matrix4<FloatType>);

impl Matrix4x4 {
    pub fn identity() -> Matrix4x4 {
        Matrix4x4(Matrix4::identity())
    }

    pub fn from_row_major(m: [FloatType; 16]) -> Matrix4x4 {
        Matrix4x4(Matrix4::from_row_slice(&m))
    }

    pub fn to_row_major(&self) -> [FloatType; 16] {
        std::array::from_fn(|i| self.0[(i / 4, i % 4)])
    }

    pub fn get(&self, row: usize, col: usize) -> FloatType {
        self.0[(row, col)]
    }

    /// Rotation about the x axis.
    #[rustfmt::skip]
    pub fn rotation_x(theta: FloatType) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4(Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,   s, 0.0,
            0.0,  -s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Rotation about the y axis.
    #[rustfmt::skip]
    pub fn rotation_y(theta: FloatType) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4(Matrix4::new(
              c, 0.0,  -s, 0.0,
            0.0, 1.0, 0.0, 0.0,
              s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Rotation about the z axis.
    #[rustfmt::skip]
    pub fn rotation_z(theta: FloatType) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4(Matrix4::new(
              c,   s, 0.0, 0.0,
             -s,   c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// `self * rhs`
    pub fn mul(&self, rhs: &Matrix4x4) -> Matrix4x4 {
        Matrix4x4(self.0 * rhs.0)
    }

    fn rotation_block(&self) -> Matrix3<FloatType> {
        self.0.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Whether the matrix is an orthonormal rotation followed by a translation.
    pub fn is_rigid(&self) -> bool {
        let rotation = self.rotation_block();
        let orthonormal = (rotation * rotation.transpose() - Matrix3::identity())
            .iter()
            .all(|x| x.abs() < RIGID_TOLERANCE);
        let last_column = self.0.column(3);
        let affine = last_column[0].abs() < RIGID_TOLERANCE
            && last_column[1].abs() < RIGID_TOLERANCE
            && last_column[2].abs() < RIGID_TOLERANCE
            && (last_column[3] - 1.0).abs() < RIGID_TOLERANCE;
        orthonormal && affine
    }

    /// Inverse of a rigid transform: transposed rotation and the translation moved
    /// back through it.
    ///
    /// Only correct for matrices where `is_rigid()` holds; anything with scale or
    /// shear gives a wrong result (checked in debug builds).
    pub fn rigid_inverse(&self) -> Matrix4x4 {
        debug_assert!(
            self.is_rigid(),
            "rigid_inverse of a non-rigid matrix {self}"
        );

        let rotation_t = self.rotation_block().transpose();
        let translation = self.0.fixed_view::<1, 3>(3, 0).into_owned();

        let mut inverse = Matrix4::<FloatType>::identity();
        inverse.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation_t);
        inverse
            .fixed_view_mut::<1, 3>(3, 0)
            .copy_from(&-(translation * rotation_t));
        Matrix4x4(inverse)
    }

    /// Returns a copy with (tx, ty, tz) added to the translation row.
    pub fn post_cat_txyz(&self, tx: FloatType, ty: FloatType, tz: FloatType) -> Matrix4x4 {
        let mut m = self.0;
        m[(3, 0)] += tx;
        m[(3, 1)] += ty;
        m[(3, 2)] += tz;
        Matrix4x4(m)
    }

    /// Returns a copy with the first three columns scaled by (sx, sy, sz).
    pub fn post_cat_sxyz(&self, sx: FloatType, sy: FloatType, sz: FloatType) -> Matrix4x4 {
        let mut m = self.0;
        for (col, s) in [sx, sy, sz].into_iter().enumerate() {
            m.column_mut(col).scale_mut(s);
        }
        Matrix4x4(m)
    }

    /// Translation row as a position.
    pub fn translation(&self) -> Vector4 {
        Vector4::point(self.0[(3, 0)], self.0[(3, 1)], self.0[(3, 2)])
    }

    pub(crate) fn add_translation(&mut self, d: &Vector4) {
        self.0[(3, 0)] += d.x();
        self.0[(3, 1)] += d.y();
        self.0[(3, 2)] += d.z();
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<&Matrix4x4> for &Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: &Matrix4x4) -> Matrix4x4 {
        Matrix4x4::mul(self, rhs)
    }
}

impl fmt::Display for Matrix4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Matrix4x4")?;
        for (i, x) in self.to_row_major().iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " " } else { ", " }, x)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::geometry::test::RigidMatrixWrapper;
    use assert2::assert;
    use std::f32::consts::FRAC_PI_2;
    use test_case::test_case;
    use test_strategy::proptest;

    /// Largest absolute difference between elements of two matrices.
    pub fn max_difference(a: &Matrix4x4, b: &Matrix4x4) -> FloatType {
        (a.0 - b.0)
            .iter()
            .fold(0.0 as FloatType, |acc, x| acc.max(x.abs()))
    }

    #[test]
    fn row_major_round_trip() {
        let values: [FloatType; 16] = std::array::from_fn(|i| i as FloatType);
        let m = Matrix4x4::from_row_major(values);
        assert!(m.to_row_major() == values);
        assert!(m.get(3, 1) == 13.0);
        assert!(m.get(1, 3) == 7.0);
    }

    #[test_case(Matrix4x4::rotation_x(FRAC_PI_2), [0.0, 1.0, 0.0], [0.0, 0.0, 1.0] ; "x_turns_y_into_z")]
    #[test_case(Matrix4x4::rotation_y(FRAC_PI_2), [0.0, 0.0, 1.0], [1.0, 0.0, 0.0] ; "y_turns_z_into_x")]
    #[test_case(Matrix4x4::rotation_z(FRAC_PI_2), [1.0, 0.0, 0.0], [0.0, 1.0, 0.0] ; "z_turns_x_into_y")]
    fn rotations(m: Matrix4x4, from: [FloatType; 3], to: [FloatType; 3]) {
        let rotated = Vector4::direction(from[0], from[1], from[2]) * &m;
        for (a, b) in rotated.xyz().iter().zip(to.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!(m.is_rigid());
    }

    #[test]
    fn product_applies_left_first() {
        let t = Matrix4x4::identity().post_cat_txyz(1.0, 0.0, 0.0);
        let r = Matrix4x4::rotation_z(FRAC_PI_2);
        let p = Vector4::point(0.0, 0.0, 0.0) * &(&t * &r);
        assert!((p.x() - 0.0).abs() < 1e-6);
        assert!((p.y() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn post_cat_scale() {
        let m = Matrix4x4::identity()
            .post_cat_txyz(1.0, 2.0, 3.0)
            .post_cat_sxyz(2.0, 3.0, 4.0);
        assert!(m.translation().xyz() == [2.0, 6.0, 12.0]);
        assert!(m.get(0, 0) == 2.0);
        assert!(m.get(1, 1) == 3.0);
        assert!(m.get(2, 2) == 4.0);
        assert!(m.get(3, 3) == 1.0);
        assert!(!m.is_rigid());
    }

    #[test]
    fn post_cat_does_not_mutate() {
        let m = Matrix4x4::identity();
        let _ = m.post_cat_txyz(1.0, 1.0, 1.0);
        assert!(m == Matrix4x4::identity());
    }

    #[test]
    fn display() {
        let s = Matrix4x4::identity().to_string();
        assert!(s.starts_with("[Matrix4x4 1, 0, 0, 0, 0, 1"));
        assert!(s.ends_with("0, 0, 0, 1]"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn rigid_inverse_rejects_scale_in_debug() {
        Matrix4x4::identity()
            .post_cat_sxyz(2.0, 1.0, 1.0)
            .rigid_inverse();
    }

    #[proptest]
    fn rigid_inverse_is_inverse(m: RigidMatrixWrapper) {
        let product = &*m * &m.rigid_inverse();
        assert!(max_difference(&product, &Matrix4x4::identity()) < 1e-3);
    }
}
