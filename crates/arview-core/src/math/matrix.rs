// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat4` type and the factories that build world, camera,
//! projection and viewport transforms.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, Mul};

use super::{Vec3, Vec4, EPSILON, PI};
use crate::error::MathError;

/// A 4x4 row-major matrix of `f64`, using the row-vector convention.
///
/// A point is transformed with `p' = p * M`, so the translation components
/// live in the fourth row and `A * B` means "apply `A`, then `B`". Entries
/// are addressed as `M[row][col]`; the documentation uses the 1-based names
/// `M11`..`M44` and calls the translation row `OffsetX/Y/Z`.
///
/// Every factory is a pure function of its arguments. Factories whose
/// arguments can describe a degenerate transform return a [`MathError`]
/// instead of a matrix with `NaN` or infinite entries.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The rows of the matrix. `rows[3]` holds the translation.
    pub rows: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        rows: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four row vectors.
    #[inline]
    pub const fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            rows: [r0, r1, r2, r3],
        }
    }

    /// Builds a matrix from 16 values in row-major order.
    ///
    /// This is the adapter for the flat `float[16]` buffers a tracking engine
    /// hands out for model-view and projection matrices.
    pub fn from_row_major(m: [f32; 16]) -> Self {
        let r = |i: usize| {
            Vec4::new(
                f64::from(m[i * 4]),
                f64::from(m[i * 4 + 1]),
                f64::from(m[i * 4 + 2]),
                f64::from(m[i * 4 + 3]),
            )
        };
        Self::from_rows(r(0), r(1), r(2), r(3))
    }

    /// Builds a matrix from a slice that must hold exactly 16 row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidArrayLength`] for any other slice length.
    pub fn from_row_major_slice(m: &[f32]) -> Result<Self, MathError> {
        let array: [f32; 16] = m.try_into().map_err(|_| MathError::InvalidArrayLength {
            expected: 16,
            actual: m.len(),
        })?;
        Ok(Self::from_row_major(array))
    }

    /// Returns the 16 components in row-major order.
    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.get(i / 4, i % 4);
        }
        out
    }

    /// Returns the 16 components in row-major order, narrowed to `f32`.
    pub fn to_row_major_f32(&self) -> [f32; 16] {
        self.to_row_major().map(|v| v as f32)
    }

    /// Returns the element at `row`, `col` (both zero-based).
    ///
    /// # Panics
    /// Panics if `row` or `col` is greater than 3.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row].get(col)
    }

    /// Returns a row of the matrix.
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        self.rows[index]
    }

    /// Returns a column of the matrix.
    #[inline]
    pub fn col(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.rows[0].get(index),
            self.rows[1].get(index),
            self.rows[2].get(index),
            self.rows[3].get(index),
        )
    }

    /// Returns the translation stored in the fourth row.
    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.rows[3].truncate()
    }

    /// Returns `true` if every element is finite.
    pub fn is_finite(&self) -> bool {
        self.to_row_major().iter().all(|v| v.is_finite())
    }

    // --- World transformations ---

    /// Creates a translation matrix.
    #[inline]
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows(Vec4::X, Vec4::Y, Vec4::Z, Vec4::new(x, y, z, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a uniform scaling matrix.
    #[inline]
    pub fn uniform_scale(xyz: f64) -> Self {
        Self::scale(xyz, xyz, xyz)
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `radians`: The angle of rotation in radians.
    #[inline]
    pub fn rotation_x(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the Y-axis.
    ///
    /// # Arguments
    ///
    /// * `radians`: The angle of rotation in radians.
    #[inline]
    pub fn rotation_y(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    ///
    /// # Arguments
    ///
    /// * `radians`: The angle of rotation in radians.
    #[inline]
    pub fn rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a matrix that rotates around an arbitrary axis.
    ///
    /// The axis does not need to be normalized. The angle is negated before
    /// the Rodrigues terms are built, which turns the column-vector form into
    /// its row-vector transpose: `rotation_around_axis(a, Vec3::Z)` equals
    /// `rotation_z(a)`, and the same holds for the X and Y axes.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::ZeroLengthVector`] if `axis` has zero length.
    pub fn rotation_around_axis(radians: f64, axis: Vec3) -> Result<Self, MathError> {
        let Vec3 { x, y, z } = axis.normalize()?;
        let (s, c) = (-radians).sin_cos();
        let t = 1.0 - c;

        Ok(Self::from_rows(
            Vec4::new(x * x * t + c, x * y * t - z * s, x * z * t + y * s, 0.0),
            Vec4::new(y * x * t + z * s, y * y * t + c, y * z * t - x * s, 0.0),
            Vec4::new(z * x * t - y * s, z * y * t + x * s, z * z * t + c, 0.0),
            Vec4::W,
        ))
    }

    // --- Camera transformations ---

    /// Creates a left-handed perspective projection matrix with a [0, 1] depth range.
    ///
    /// # Arguments
    ///
    /// * `fov_radians`: Vertical field of view, in `(0, PI)`.
    /// * `aspect_ratio`: Width divided by height.
    /// * `near`: Distance to the near plane (positive).
    /// * `far`: Distance to the far plane (greater than `near`).
    pub fn perspective_fov_lh(
        fov_radians: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
    ) -> Result<Self, MathError> {
        check_perspective(fov_radians, aspect_ratio, near, far)?;
        let h = 1.0 / (fov_radians * 0.5).tan();
        let w = h / aspect_ratio;
        let d = far - near;
        let sz = far / d;
        let z = -near * far / d;

        Ok(Self::from_rows(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, sz, 1.0),
            Vec4::new(0.0, 0.0, z, 0.0),
        ))
    }

    /// Creates a right-handed perspective projection matrix with a [0, 1] depth range.
    ///
    /// Arguments are the same as for [`Mat4::perspective_fov_lh`]; the camera
    /// looks down the negative z-axis.
    pub fn perspective_fov_rh(
        fov_radians: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
    ) -> Result<Self, MathError> {
        check_perspective(fov_radians, aspect_ratio, near, far)?;
        let h = 1.0 / (fov_radians * 0.5).tan();
        let w = h / aspect_ratio;
        let d = near - far;
        let sz = far / d;
        let z = near * far / d;

        Ok(Self::from_rows(
            Vec4::new(w, 0.0, 0.0, 0.0),
            Vec4::new(0.0, h, 0.0, 0.0),
            Vec4::new(0.0, 0.0, sz, -1.0),
            Vec4::new(0.0, 0.0, z, 0.0),
        ))
    }

    /// Creates a left-handed orthographic projection matrix.
    ///
    /// # Arguments
    ///
    /// * `width`, `height`: Size of the view volume.
    /// * `near`, `far`: Minimum and maximum z of the view volume.
    pub fn orthographic_lh(width: f64, height: f64, near: f64, far: f64) -> Result<Self, MathError> {
        check_orthographic(width, height, near, far)?;
        let hw = 2.0 / width;
        let hh = 2.0 / height;
        let id = 1.0 / (far - near);
        let nid = near / (near - far);

        Ok(Self::from_rows(
            Vec4::new(hw, 0.0, 0.0, 0.0),
            Vec4::new(0.0, hh, 0.0, 0.0),
            Vec4::new(0.0, 0.0, id, 0.0),
            Vec4::new(0.0, 0.0, nid, 1.0),
        ))
    }

    /// Creates a right-handed orthographic projection matrix.
    pub fn orthographic_rh(width: f64, height: f64, near: f64, far: f64) -> Result<Self, MathError> {
        check_orthographic(width, height, near, far)?;
        let hw = 2.0 / width;
        let hh = 2.0 / height;
        let id = 1.0 / (near - far);
        let nid = near * id;

        Ok(Self::from_rows(
            Vec4::new(hw, 0.0, 0.0, 0.0),
            Vec4::new(0.0, hh, 0.0, 0.0),
            Vec4::new(0.0, 0.0, id, 0.0),
            Vec4::new(0.0, 0.0, nid, 1.0),
        ))
    }

    /// Creates a left-handed view matrix for a camera at `eye` looking at `target`.
    ///
    /// The camera z-axis points from `eye` towards `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::ZeroLengthVector`] if `eye` and `target` coincide
    /// or if `up` is parallel to the viewing direction.
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        Self::look_along(eye, target - eye, up)
    }

    /// Same as [`Mat4::look_at_lh`] with the default up vector `(0, 1, 0)`.
    pub fn look_at_lh_default(eye: Vec3, target: Vec3) -> Result<Self, MathError> {
        Self::look_at_lh(eye, target, Vec3::Y)
    }

    /// Creates a right-handed view matrix for a camera at `eye` looking at `target`.
    ///
    /// The camera z-axis points from `target` back towards `eye`.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self, MathError> {
        Self::look_along(eye, eye - target, up)
    }

    /// Same as [`Mat4::look_at_rh`] with the default up vector `(0, 1, 0)`.
    pub fn look_at_rh_default(eye: Vec3, target: Vec3) -> Result<Self, MathError> {
        Self::look_at_rh(eye, target, Vec3::Y)
    }

    fn look_along(eye: Vec3, z_axis: Vec3, up: Vec3) -> Result<Self, MathError> {
        let z = z_axis.normalize()?;
        let x = up.cross(z).normalize()?;
        let y = z.cross(x);

        Ok(Self::from_rows(
            Vec4::new(x.x, y.x, z.x, 0.0),
            Vec4::new(x.y, y.y, z.y, 0.0),
            Vec4::new(x.z, y.z, z.z, 0.0),
            Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
        ))
    }

    // --- Composition ---

    /// Composes the full chain used to project a planar element onto the screen.
    ///
    /// The arguments are multiplied in order, so a model-space point goes
    /// through `world`, then `camera`, then `projection`, then `viewport`.
    #[inline]
    pub fn viewport_projection(world: Self, camera: Self, projection: Self, viewport: Self) -> Self {
        world * camera * projection * viewport
    }

    /// Creates a matrix mapping normalized device coordinates to pixels.
    ///
    /// NDC `(-1, 1)` lands on the top-left corner: the y-axis is flipped
    /// because screen y grows downwards.
    pub fn viewport_transformation(width: f64, height: f64) -> Result<Self, MathError> {
        check_positive("viewport width", width)?;
        check_positive("viewport height", height)?;
        let wh = width * 0.5;
        let hh = height * 0.5;

        Ok(Self::from_rows(
            Vec4::new(wh, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -hh, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(wh, hh, 0.0, 1.0),
        ))
    }

    // --- Utilities ---

    /// Determinant of the upper-left 3x3 block only.
    ///
    /// This ignores the translation row and the projective column, so it is
    /// the full determinant only for affine matrices.
    pub fn determinant_3x3_block(&self) -> f64 {
        let [r0, r1, r2, _] = self.rows;
        r0.x * (r1.y * r2.z - r1.z * r2.y) - r0.y * (r1.x * r2.z - r1.z * r2.x)
            + r0.z * (r1.x * r2.y - r1.y * r2.x)
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows(self.col(0), self.col(1), self.col(2), self.col(3))
    }

    /// Converts between left- and right-handed coordinates by negating the
    /// z column of the upper 3x3 block and the z offset.
    pub fn swap_handedness(&self) -> Self {
        let mut m = *self;
        for row in m.rows.iter_mut() {
            row.z = -row.z;
        }
        m
    }

    /// Inverts an affine matrix (rotation, scale and translation only).
    ///
    /// # Errors
    ///
    /// Returns [`MathError::NotAffine`] if the fourth column is not
    /// `(0, 0, 0, 1)`, and [`MathError::SingularMatrix`] if the determinant of
    /// the 3x3 block is within `EPSILON` times the product of its row lengths.
    pub fn affine_inverse(&self) -> Result<Self, MathError> {
        let projective = self.col(3);
        if projective.x.abs() > EPSILON
            || projective.y.abs() > EPSILON
            || projective.z.abs() > EPSILON
            || (projective.w - 1.0).abs() > EPSILON
        {
            return Err(MathError::NotAffine);
        }

        let determinant = self.determinant_3x3_block();
        // Relative to row lengths: a uniform tiny scale is still invertible.
        let magnitude: f64 = self.rows[..3].iter().map(|r| r.truncate().length()).product();
        if determinant.abs() <= EPSILON * magnitude {
            return Err(MathError::SingularMatrix { determinant });
        }
        let inv_det = 1.0 / determinant;
        let [a0, a1, a2, t] = self.rows;

        let i0 = Vec4::new(
            (a1.y * a2.z - a1.z * a2.y) * inv_det,
            (a0.z * a2.y - a0.y * a2.z) * inv_det,
            (a0.y * a1.z - a0.z * a1.y) * inv_det,
            0.0,
        );
        let i1 = Vec4::new(
            (a1.z * a2.x - a1.x * a2.z) * inv_det,
            (a0.x * a2.z - a0.z * a2.x) * inv_det,
            (a0.z * a1.x - a0.x * a1.z) * inv_det,
            0.0,
        );
        let i2 = Vec4::new(
            (a1.x * a2.y - a1.y * a2.x) * inv_det,
            (a0.y * a2.x - a0.x * a2.y) * inv_det,
            (a0.x * a1.y - a0.y * a1.x) * inv_det,
            0.0,
        );
        let offset = (i0 * t.x + i1 * t.y + i2 * t.z) * -1.0;

        Ok(Self::from_rows(
            i0,
            i1,
            i2,
            Vec4::new(offset.x, offset.y, offset.z, 1.0),
        ))
    }

    /// Applies the matrix to a homogeneous row vector (`v * M`).
    #[inline]
    pub fn transform(&self, v: Vec4) -> Vec4 {
        self.rows[0] * v.x + self.rows[1] * v.y + self.rows[2] * v.z + self.rows[3] * v.w
    }

    /// Transforms a point (`w = 1`) and performs the homogeneous divide.
    ///
    /// Returns `None` if the resulting `w` is too close to zero, i.e. the
    /// point lies on the camera plane of a perspective projection.
    pub fn project_point(&self, p: Vec3) -> Option<Vec3> {
        let v = self.transform(Vec4::from_vec3(p, 1.0));
        if v.w.abs() < EPSILON {
            return None;
        }
        Some(v.truncate() * (1.0 / v.w))
    }

    /// Writes the matrix row by row with two decimals per entry.
    pub fn dump(&self) -> String {
        self.rows
            .iter()
            .map(|r| format!("| {:.2} : {:.2} : {:.2} : {:.2} |", r.x, r.y, r.z, r.w))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), MathError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MathError::InvalidDimension { name, value })
    }
}

fn check_perspective(fov: f64, aspect_ratio: f64, near: f64, far: f64) -> Result<(), MathError> {
    if !(fov > 0.0 && fov < PI) {
        return Err(MathError::InvalidFieldOfView(fov));
    }
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(MathError::InvalidAspectRatio(aspect_ratio));
    }
    if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
        return Err(MathError::InvalidClipPlanes { near, far });
    }
    Ok(())
}

fn check_orthographic(width: f64, height: f64, near: f64, far: f64) -> Result<(), MathError> {
    check_positive("width", width)?;
    check_positive("height", height)?;
    if !(near.is_finite() && far.is_finite() && near < far) {
        return Err(MathError::InvalidClipPlanes { near, far });
    }
    Ok(())
}

// --- Operators Overloading ---

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Composes two transforms: `self` is applied first, then `rhs`.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self {
            rows: self.rows.map(|r| rhs.transform(r)),
        }
    }
}

impl Mul<Mat4> for Vec4 {
    type Output = Vec4;
    /// Transforms a row vector by a matrix.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        rhs.transform(self)
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    /// Allows accessing a matrix row by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2, FRAC_PI_4};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample() -> Mat4 {
        Mat4::from_rows(
            Vec4::new(1., 2., 3., 4.),
            Vec4::new(5., 6., 7., 8.),
            Vec4::new(9., 10., 11., 12.),
            Vec4::new(13., 14., 15., 16.),
        )
    }

    #[test]
    fn test_identity_default() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn test_translation() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m.row(3), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(m.offset(), Vec3::new(1.0, 2.0, 3.0));
        let p = Vec4::new(1.0, 1.0, 1.0, 1.0) * m;
        assert_eq!(p, Vec4::new(2.0, 3.0, 4.0, 1.0));

        // Directions are not translated
        let d = Vec4::new(1.0, 1.0, 1.0, 0.0) * m;
        assert_eq!(d, Vec4::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale() {
        let p = Vec4::new(1.0, 1.0, 1.0, 1.0) * Mat4::scale(2.0, 3.0, 4.0);
        assert_eq!(p, Vec4::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(Mat4::uniform_scale(5.0), Mat4::scale(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_rotation_x() {
        let p = Vec4::new(0.0, 1.0, 0.0, 1.0) * Mat4::rotation_x(FRAC_PI_2);
        assert_abs_diff_eq!(p, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotation_y() {
        let p = Vec4::new(0.0, 0.0, 1.0, 1.0) * Mat4::rotation_y(FRAC_PI_2);
        assert_abs_diff_eq!(p, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_z() {
        let m = Mat4::rotation_z(FRAC_PI_4);
        let (s, c) = FRAC_PI_4.sin_cos();
        assert_eq!(m.row(0), Vec4::new(c, s, 0.0, 0.0));
        assert_eq!(m.row(1), Vec4::new(-s, c, 0.0, 0.0));

        let p = Vec4::new(1.0, 0.0, 0.0, 1.0) * Mat4::rotation_z(FRAC_PI_2);
        assert_abs_diff_eq!(p, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_around_axis_matches_principal_axes() {
        for angle in [-2.5, -0.3, 0.0, 0.7, FRAC_PI_2, 3.0] {
            assert_abs_diff_eq!(
                Mat4::rotation_around_axis(angle, Vec3::X).unwrap(),
                Mat4::rotation_x(angle)
            );
            assert_abs_diff_eq!(
                Mat4::rotation_around_axis(angle, Vec3::Y).unwrap(),
                Mat4::rotation_y(angle)
            );
            assert_abs_diff_eq!(
                Mat4::rotation_around_axis(angle, Vec3::new(0.0, 0.0, 7.5)).unwrap(),
                Mat4::rotation_z(angle)
            );
        }
    }

    #[test]
    fn test_rotation_around_axis_keeps_axis_fixed() {
        let axis = Vec3::new(1.0, 1.0, 1.0);
        let m = Mat4::rotation_around_axis(1.2 * PI, axis).unwrap();
        let p = m.project_point(axis).unwrap();
        assert_relative_eq!(p, axis);
        assert_relative_eq!(m.determinant_3x3_block(), 1.0, epsilon = 1e-12);

        // A third of a turn around (1,1,1) permutes the basis vectors
        let m = Mat4::rotation_around_axis(2.0 * PI / 3.0, axis).unwrap();
        assert_relative_eq!(m.project_point(Vec3::X).unwrap(), Vec3::Y);
    }

    #[test]
    fn test_rotation_around_zero_axis_fails() {
        assert_eq!(
            Mat4::rotation_around_axis(1.0, Vec3::ZERO),
            Err(MathError::ZeroLengthVector)
        );
    }

    #[test]
    fn test_mul_order() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let r = Mat4::rotation_z(FRAC_PI_2);
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);

        // Translate to (2,0,0), then rotate to (0,2,0)
        assert_abs_diff_eq!(p * (t * r), Vec4::new(0.0, 2.0, 0.0, 1.0));
        // Rotate to (0,1,0), then translate to (1,1,0)
        assert_abs_diff_eq!(p * (r * t), Vec4::new(1.0, 1.0, 0.0, 1.0));
        // Associativity of point application
        assert_abs_diff_eq!((p * t) * r, p * (t * r));
    }

    #[test]
    fn test_perspective_lh() {
        let m = Mat4::perspective_fov_lh(FRAC_PI_2, 2.0, 1.0, 11.0).unwrap();
        assert!(approx_eq(m.get(1, 1), 1.0));
        assert!(approx_eq(m.get(0, 0), 0.5));
        assert!(approx_eq(m.get(2, 2), 11.0 / 10.0));
        assert!(approx_eq(m.get(3, 2), -11.0 / 10.0));
        assert_eq!(m.get(2, 3), 1.0);
        assert_eq!(m.get(3, 3), 0.0);
    }

    #[test]
    fn test_perspective_rh() {
        let m = Mat4::perspective_fov_rh(FRAC_PI_2, 1.0, 1.0, 100.0).unwrap();
        assert!(approx_eq(m.get(2, 2), 100.0 / -99.0));
        assert!(approx_eq(m.get(3, 2), 100.0 / -99.0));
        assert_eq!(m.get(2, 3), -1.0);

        // RH looks down -z
        let near = m.project_point(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let far = m.project_point(Vec3::new(0.0, 0.0, -100.0)).unwrap();
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_lh_and_rh_differ() {
        let lh = Mat4::perspective_fov_lh(1.0, 1.5, 0.5, 50.0).unwrap();
        let rh = Mat4::perspective_fov_rh(1.0, 1.5, 0.5, 50.0).unwrap();
        assert_ne!(lh, rh);
        assert_eq!(lh.row(0), rh.row(0));
        assert_eq!(lh.row(1), rh.row(1));
        assert!(approx_eq(lh.get(2, 2), -rh.get(2, 2)));
        assert_eq!(lh.get(2, 3), -rh.get(2, 3));
    }

    #[test]
    fn test_perspective_validation() {
        assert_eq!(
            Mat4::perspective_fov_lh(0.0, 1.0, 1.0, 10.0),
            Err(MathError::InvalidFieldOfView(0.0))
        );
        assert_eq!(
            Mat4::perspective_fov_rh(PI, 1.0, 1.0, 10.0),
            Err(MathError::InvalidFieldOfView(PI))
        );
        assert!(matches!(
            Mat4::perspective_fov_lh(f64::NAN, 1.0, 1.0, 10.0),
            Err(MathError::InvalidFieldOfView(_))
        ));
        assert_eq!(
            Mat4::perspective_fov_lh(1.0, 0.0, 1.0, 10.0),
            Err(MathError::InvalidAspectRatio(0.0))
        );
        assert_eq!(
            Mat4::perspective_fov_rh(1.0, -1.0, 1.0, 10.0),
            Err(MathError::InvalidAspectRatio(-1.0))
        );
        assert_eq!(
            Mat4::perspective_fov_lh(1.0, 1.0, 10.0, 10.0),
            Err(MathError::InvalidClipPlanes { near: 10.0, far: 10.0 })
        );
        assert_eq!(
            Mat4::perspective_fov_rh(1.0, 1.0, 0.0, 10.0),
            Err(MathError::InvalidClipPlanes { near: 0.0, far: 10.0 })
        );
    }

    #[test]
    fn test_orthographic() {
        let lh = Mat4::orthographic_lh(4.0, 2.0, 1.0, 11.0).unwrap();
        assert!(approx_eq(lh.get(0, 0), 0.5));
        assert!(approx_eq(lh.get(1, 1), 1.0));
        assert!(approx_eq(lh.get(2, 2), 0.1));
        assert!(approx_eq(lh.get(3, 2), -0.1));
        let near = lh.project_point(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let far = lh.project_point(Vec3::new(0.0, 0.0, 11.0)).unwrap();
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-12);

        let rh = Mat4::orthographic_rh(4.0, 2.0, 1.0, 11.0).unwrap();
        assert!(approx_eq(rh.get(2, 2), -0.1));
        assert!(approx_eq(rh.get(3, 2), -0.1));
        let near = rh.project_point(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        let far = rh.project_point(Vec3::new(0.0, 0.0, -11.0)).unwrap();
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orthographic_validation() {
        assert_eq!(
            Mat4::orthographic_lh(0.0, 1.0, 0.0, 1.0),
            Err(MathError::InvalidDimension { name: "width", value: 0.0 })
        );
        assert_eq!(
            Mat4::orthographic_rh(1.0, -2.0, 0.0, 1.0),
            Err(MathError::InvalidDimension { name: "height", value: -2.0 })
        );
        assert_eq!(
            Mat4::orthographic_lh(1.0, 1.0, 5.0, 1.0),
            Err(MathError::InvalidClipPlanes { near: 5.0, far: 1.0 })
        );
        // A zero near plane is valid for an orthographic box
        assert!(Mat4::orthographic_rh(1.0, 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_look_at_lh() {
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let m = Mat4::look_at_lh_default(eye, Vec3::ZERO).unwrap();
        assert_abs_diff_eq!(m, Mat4::translation(0.0, 0.0, 5.0));

        // The target ends up straight ahead on +z
        let p = m.project_point(Vec3::ZERO).unwrap();
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_look_at_rh() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let m = Mat4::look_at_rh_default(eye, Vec3::ZERO).unwrap();
        assert_abs_diff_eq!(m, Mat4::translation(0.0, 0.0, -5.0));

        // The target ends up straight ahead on -z
        let p = m.project_point(Vec3::ZERO).unwrap();
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let m = Mat4::look_at_lh(
            Vec3::new(3.0, 4.0, -2.0),
            Vec3::new(-1.0, 0.5, 6.0),
            Vec3::new(0.1, 1.0, 0.0),
        )
        .unwrap();
        let x = m.col(0).truncate();
        let y = m.col(1).truncate();
        let z = m.col(2).truncate();
        assert_relative_eq!(x.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(y.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(z.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x.dot(y), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y.dot(z), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(z.dot(x), 0.0, epsilon = 1e-12);
        // The eye maps to the camera origin
        assert_abs_diff_eq!(
            m.project_point(Vec3::new(3.0, 4.0, -2.0)).unwrap(),
            Vec3::ZERO,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_look_at_invalid() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(
            Mat4::look_at_rh_default(eye, eye),
            Err(MathError::ZeroLengthVector)
        );
        // Up parallel to the view direction
        assert_eq!(
            Mat4::look_at_lh(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), Vec3::Y),
            Err(MathError::ZeroLengthVector)
        );
    }

    #[test]
    fn test_viewport_transformation() {
        let m = Mat4::viewport_transformation(640.0, 480.0).unwrap();
        assert_eq!(m.row(0), Vec4::new(320.0, 0.0, 0.0, 0.0));
        assert_eq!(m.row(1), Vec4::new(0.0, -240.0, 0.0, 0.0));
        assert_eq!(m.row(3), Vec4::new(320.0, 240.0, 0.0, 1.0));
        assert_relative_eq!(
            m.project_point(Vec3::new(-1.0, 1.0, 0.0)).unwrap(),
            Vec3::ZERO
        );

        assert_eq!(
            Mat4::viewport_transformation(0.0, 480.0),
            Err(MathError::InvalidDimension {
                name: "viewport width",
                value: 0.0
            })
        );
        assert!(Mat4::viewport_transformation(640.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_viewport_projection_composes_in_order() {
        let world = Mat4::translation(1.0, 0.0, 0.0);
        let camera = Mat4::rotation_z(FRAC_PI_2);
        let projection = Mat4::uniform_scale(2.0);
        let viewport = Mat4::translation(0.0, 0.0, 3.0);
        let m = Mat4::viewport_projection(world, camera, projection, viewport);
        assert_eq!(m, world * camera * projection * viewport);

        // (0,0,0) -> (1,0,0) -> (0,1,0) -> (0,2,0) -> (0,2,3)
        assert_relative_eq!(m.project_point(Vec3::ZERO).unwrap(), Vec3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn test_determinant_3x3_block() {
        assert_eq!(Mat4::IDENTITY.determinant_3x3_block(), 1.0);
        assert_eq!(Mat4::ZERO.determinant_3x3_block(), 0.0);
        assert_eq!(Mat4::scale(2.0, 3.0, 4.0).determinant_3x3_block(), 24.0);
        // Translation and projective terms do not contribute
        let mut m = Mat4::translation(5.0, 6.0, 7.0) * Mat4::scale(2.0, 3.0, 4.0);
        m.rows[2].w = 9.0;
        assert_eq!(m.determinant_3x3_block(), 24.0);
        assert_relative_eq!(
            Mat4::rotation_y(0.4).determinant_3x3_block(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_transpose() {
        let m = sample();
        let mt = m.transpose();
        assert_eq!(mt.row(0), Vec4::new(1., 5., 9., 13.));
        assert_eq!(mt.row(3), Vec4::new(4., 8., 12., 16.));
        assert_eq!(mt.transpose(), m);
    }

    #[test]
    fn test_swap_handedness() {
        let m = sample();
        let s = m.swap_handedness();
        assert_eq!(s.row(0), Vec4::new(1., 2., -3., 4.));
        assert_eq!(s.row(1), Vec4::new(5., 6., -7., 8.));
        assert_eq!(s.row(2), Vec4::new(9., 10., -11., 12.));
        assert_eq!(s.row(3), Vec4::new(13., 14., -15., 16.));
        assert_eq!(s.swap_handedness(), m);
    }

    #[test]
    fn test_swap_handedness_converts_look_at() {
        // Mirroring the world in z turns a LH camera into the matching RH camera
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let lh = Mat4::look_at_lh_default(eye, Vec3::ZERO).unwrap();
        let rh = Mat4::look_at_rh_default(eye, Vec3::ZERO).unwrap();
        assert_eq!(lh.swap_handedness().col(2), rh.col(2));
    }

    #[test]
    fn test_affine_inverse() {
        let m = Mat4::scale(1.0, 2.0, 0.5) * Mat4::rotation_y(PI / 3.0) * Mat4::translation(1.0, 2.0, 3.0);
        let inv = m.affine_inverse().unwrap();
        assert_abs_diff_eq!(m * inv, Mat4::IDENTITY, epsilon = 1e-12);
        assert_abs_diff_eq!(inv * m, Mat4::IDENTITY, epsilon = 1e-12);
    }

    #[test]
    fn test_affine_inverse_errors() {
        let singular = Mat4::translation(1.0, 2.0, 3.0) * Mat4::scale(1.0, 0.0, 1.0);
        assert_eq!(
            singular.affine_inverse(),
            Err(MathError::SingularMatrix { determinant: 0.0 })
        );

        let projection = Mat4::perspective_fov_lh(1.0, 1.0, 1.0, 10.0).unwrap();
        assert_eq!(projection.affine_inverse(), Err(MathError::NotAffine));
    }

    #[test]
    fn test_affine_inverse_is_scale_independent() {
        let tiny = Mat4::uniform_scale(0.0005) * Mat4::translation(1.0, 2.0, 3.0);
        assert!(tiny.determinant_3x3_block().abs() < EPSILON);
        let inv = tiny.affine_inverse().unwrap();
        assert_abs_diff_eq!(tiny * inv, Mat4::IDENTITY, epsilon = 1e-9);

        let collinear = Mat4::from_rows(
            Vec4::new(1.0e-4, 2.0e-4, 3.0e-4, 0.0),
            Vec4::new(2.0e-4, 4.0e-4, 6.0e-4, 0.0),
            Vec4::Z,
            Vec4::W,
        );
        assert!(matches!(
            collinear.affine_inverse(),
            Err(MathError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_project_point_on_camera_plane() {
        let m = Mat4::perspective_fov_lh(1.0, 1.0, 1.0, 10.0).unwrap();
        assert!(m.project_point(Vec3::new(1.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_row_major_round_trip() {
        let values: [f32; 16] = [
            1.5, -2.0, 3.25, 0.0, 4.0, 5.5, -6.0, 0.125, 7.0, 8.0, 9.75, -1.0, 10.0, 11.0, -12.5,
            1.0,
        ];
        let m = Mat4::from_row_major(values);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(m.get(i / 4, i % 4), f64::from(*v));
        }
        assert_eq!(m.to_row_major_f32(), values);
        assert_eq!(Mat4::from_row_major_slice(&values).unwrap(), m);
    }

    #[test]
    fn test_row_major_slice_length() {
        assert_eq!(
            Mat4::from_row_major_slice(&[0.0; 15]),
            Err(MathError::InvalidArrayLength {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(
            Mat4::from_row_major_slice(&[]),
            Err(MathError::InvalidArrayLength {
                expected: 16,
                actual: 0
            })
        );
    }

    #[test]
    fn test_dump() {
        let m = Mat4::translation(1.0, -2.5, 0.25);
        let expected = "| 1.00 : 0.00 : 0.00 : 0.00 |\n\
                        | 0.00 : 1.00 : 0.00 : 0.00 |\n\
                        | 0.00 : 0.00 : 1.00 : 0.00 |\n\
                        | 1.00 : -2.50 : 0.25 : 1.00 |";
        assert_eq!(m.dump(), expected);
        assert_eq!(m.to_string(), expected);
    }

    #[test]
    fn test_index() {
        let m = sample();
        assert_eq!(m[2], Vec4::new(9., 10., 11., 12.));
        assert_eq!(m.col(1), Vec4::new(2., 6., 10., 14.));
    }
}
