//! Transform builders and their composing wrappers.
//!
//! The `as_*` methods overwrite the receiver with a fresh transform, using the
//! receiver's current shape to pick between homogeneous and non-homogeneous
//! layouts where both exist. The wrapper methods ([`Matrix::rotate`],
//! [`Matrix::translate`], [`Matrix::scale_uniform`], [`Matrix::scale_vector`])
//! build the transform into a function-local scratch matrix and right-multiply
//! it onto the receiver, so a chain of wrappers applies its steps in reverse
//! order to the vectors eventually transformed.

use crate::{dim_check, Error, Result, Shape, Vector};

use super::Matrix;

impl Matrix {
    /// Overwrites this 4×4 matrix with a camera matrix for a camera at
    /// `position`, axis-aligned and looking down negative z.
    ///
    /// `position` must have 3 elements.
    pub fn as_view(&mut self, position: &Vector) -> Result<&mut Self> {
        dim_check(&self.shape, &Shape::rank2(4, 4))?;
        dim_check(position.shape(), &Shape::rank1(3))?;
        self.identity();
        self.elems[3] = position[0];
        self.elems[7] = position[1];
        self.elems[11] = position[2];
        Ok(self)
    }

    /// Overwrites this 4×4 matrix with an orthographic projection mapping the
    /// axis-aligned box bounded by the six clipping planes onto the unit cube.
    ///
    /// Returns [`Error::RangeInvalid`] when any opposing pair of planes
    /// coincides.
    pub fn as_orthographic(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Result<&mut Self> {
        dim_check(&self.shape, &Shape::rank2(4, 4))?;
        if right - left == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_orthographic",
                what: "right and left cannot have the same value",
            });
        }
        if top - bottom == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_orthographic",
                what: "top and bottom cannot have the same value",
            });
        }
        if far - near == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_orthographic",
                what: "far and near cannot have the same value",
            });
        }

        self.identity();
        self.elems[0] = 2.0 / (right - left);
        self.elems[3] = -(right + left) / (right - left);
        self.elems[5] = 2.0 / (top - bottom);
        self.elems[7] = -(top + bottom) / (top - bottom);
        self.elems[10] = -2.0 / (far - near);
        self.elems[11] = -(far + near) / (far - near);
        Ok(self)
    }

    /// Overwrites this 4×4 matrix with a perspective projection.
    ///
    /// `fov` is the half-angle, in radians, between the view direction and the
    /// top clipping plane; `aspect` is the width:height ratio of the viewport.
    /// Zero `near`, `far`, or `fov` values are nudged to the smallest positive
    /// number rather than producing a degenerate frustum.
    ///
    /// Returns [`Error::RangeInvalid`] when the near and far planes coincide
    /// or `aspect` is zero.
    pub fn as_perspective(&mut self, near: f64, far: f64, aspect: f64, fov: f64) -> Result<&mut Self> {
        dim_check(&self.shape, &Shape::rank2(4, 4))?;
        if far - near == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_perspective",
                what: "near and far cannot have the same value",
            });
        }
        if aspect == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_perspective",
                what: "aspect cannot equal zero",
            });
        }
        let near = if near == 0.0 { f64::MIN_POSITIVE } else { near };
        let far = if far == 0.0 { f64::MIN_POSITIVE } else { far };
        let fov = if fov == 0.0 { f64::MIN_POSITIVE } else { fov };

        let top = near * fov.tan();
        let right = top * aspect;

        self.identity();
        self.elems[0] = near / right;
        self.elems[5] = near / top;
        self.elems[10] = -(far + near) / (far - near);
        self.elems[11] = -2.0 * far * near / (far - near);
        self.elems[14] = -1.0;
        self.elems[15] = 0.0;
        Ok(self)
    }

    /// Overwrites this matrix with a planar rotation by `angle` radians,
    /// counterclockwise for positive angles.
    ///
    /// The receiver must be a non-homogeneous 2×2 matrix or a homogeneous 3×3
    /// matrix; any other shape returns [`Error::DimensionMismatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::f64::consts::FRAC_PI_2;
    /// # use approx::assert_relative_eq;
    /// # use xform::{Matrix, Vector};
    /// let mut m = Matrix::with_shape(2, 2);
    /// m.as_rotation_angle(FRAC_PI_2)?;
    /// let v = m.mul_vector(&Vector::from([1.0, 0.0]))?;
    /// assert_relative_eq!(v, Vector::from([0.0, 1.0]), epsilon = 1e-12);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn as_rotation_angle(&mut self, angle: f64) -> Result<&mut Self> {
        let (c, s) = (angle.cos(), angle.sin());
        let (m, n) = (self.rows(), self.cols());
        if !(m == n && (m == 2 || m == 3)) {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: Shape::rank2(3, 3),
            });
        }
        self.identity();
        self.elems[0] = c;
        self.elems[1] = -s;
        self.elems[n] = s;
        self.elems[n + 1] = c;
        Ok(self)
    }

    /// Overwrites this matrix with a rotation of `angle` radians about `axis`,
    /// counterclockwise when viewed from the tip of the axis.
    ///
    /// The receiver must be a non-homogeneous 3×3 matrix or a homogeneous 4×4
    /// matrix; any other shape returns [`Error::DimensionMismatch`]. `axis`
    /// must have 3 elements and is normalized internally; the zero vector
    /// returns [`Error::RangeInvalid`].
    pub fn as_rotation_axis(&mut self, axis: &Vector, angle: f64) -> Result<&mut Self> {
        dim_check(axis.shape(), &Shape::rank1(3))?;
        let (mut x, mut y, mut z) = (axis[0], axis[1], axis[2]);
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Err(Error::RangeInvalid {
                op: "as_rotation_axis",
                what: "axis cannot be the zero vector",
            });
        }
        let mag = (x * x + y * y + z * z).sqrt();
        x /= mag;
        y /= mag;
        z /= mag;

        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;

        let (m, n) = (self.rows(), self.cols());
        if !(m == n && (m == 3 || m == 4)) {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: Shape::rank2(4, 4),
            });
        }
        self.identity();
        self.elems[0] = x * x * t + c;
        self.elems[1] = x * y * t - z * s;
        self.elems[2] = x * z * t + y * s;
        self.elems[n] = x * y * t + z * s;
        self.elems[n + 1] = y * y * t + c;
        self.elems[n + 2] = y * z * t - x * s;
        self.elems[2 * n] = x * z * t - y * s;
        self.elems[2 * n + 1] = y * z * t + x * s;
        self.elems[2 * n + 2] = z * z * t + c;
        Ok(self)
    }

    /// Overwrites this matrix with a homogeneous translation by `offset`.
    ///
    /// The receiver must be square with at least 3 rows, and `offset` must
    /// have one element fewer than the receiver has rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::{Matrix, Vector};
    /// let mut m = Matrix::new();
    /// m.as_translation(&Vector::from([1.0, 2.0, 3.0]))?;
    /// let moved = m.mul_vector(&Vector::from([0.0, 0.0, 0.0, 1.0]))?;
    /// assert_eq!(moved, [1.0, 2.0, 3.0, 1.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn as_translation(&mut self, offset: &Vector) -> Result<&mut Self> {
        let (m, n) = (self.rows(), self.cols());
        if m != n {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: Shape::rank2(m, m),
            });
        }
        if m < 3 {
            return Err(Error::InvalidArgument {
                op: "as_translation",
                what: "matrix must have at least 3 rows for homogeneous coordinates",
            });
        }
        dim_check(offset.shape(), &Shape::rank1(m - 1))?;

        self.identity();
        for (i, &value) in offset.as_slice().iter().enumerate() {
            self.elems[(i + 1) * n - 1] = value;
        }
        Ok(self)
    }

    /// Overwrites this matrix with a homogeneous scale by a single factor.
    ///
    /// All diagonal entries except the last are set to `factor`; the last
    /// stays 1 so the homogeneous coordinate is preserved.
    pub fn as_scale_uniform(&mut self, factor: f64) -> Result<&mut Self> {
        let (m, n) = (self.rows(), self.cols());
        self.identity();
        for i in 0..m.saturating_sub(1) {
            self.elems[i * n + i] = factor;
        }
        Ok(self)
    }

    /// Overwrites this matrix with a homogeneous scale by per-axis factors.
    ///
    /// `factors` must have one element fewer than the receiver has rows.
    pub fn as_scale_vector(&mut self, factors: &Vector) -> Result<&mut Self> {
        let (m, n) = (self.rows(), self.cols());
        dim_check(factors.shape(), &Shape::rank1(m.saturating_sub(1)))?;
        self.identity();
        for (i, &factor) in factors.as_slice().iter().enumerate() {
            self.elems[i * n + i] = factor;
        }
        Ok(self)
    }

    /// Right-multiplies a rotation about `axis` onto this matrix.
    ///
    /// Errors raised while building the rotation report `rotate` as the
    /// failing operation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::f64::consts::PI;
    /// # use approx::assert_relative_eq;
    /// # use xform::{Matrix, Vector};
    /// let mut m = Matrix::new();
    /// m.rotate(&Vector::from([1.0, 0.0, 0.0]), PI)?;
    /// let v = m.mul_vector(&Vector::from([0.0, 1.0, 0.0, 1.0]))?;
    /// assert_relative_eq!(v, Vector::from([0.0, -1.0, 0.0, 1.0]), epsilon = 1e-12);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn rotate(&mut self, axis: &Vector, angle: f64) -> Result<&mut Self> {
        let mut rotation = Matrix::with_shape(self.rows(), self.cols());
        rotation
            .as_rotation_axis(axis, angle)
            .map_err(|e| e.with_op("rotate"))?;
        self.mul(&rotation)
    }

    /// Right-multiplies a planar rotation by `angle` radians onto this matrix.
    pub fn rotate_angle(&mut self, angle: f64) -> Result<&mut Self> {
        let mut rotation = Matrix::with_shape(self.rows(), self.cols());
        rotation
            .as_rotation_angle(angle)
            .map_err(|e| e.with_op("rotate_angle"))?;
        self.mul(&rotation)
    }

    /// Right-multiplies a translation by `offset` onto this matrix.
    pub fn translate(&mut self, offset: &Vector) -> Result<&mut Self> {
        let mut translation = Matrix::with_shape(self.rows(), self.cols());
        translation
            .as_translation(offset)
            .map_err(|e| e.with_op("translate"))?;
        self.mul(&translation)
    }

    /// Right-multiplies a uniform homogeneous scale onto this matrix.
    pub fn scale_uniform(&mut self, factor: f64) -> Result<&mut Self> {
        let mut scale = Matrix::with_shape(self.rows(), self.cols());
        scale
            .as_scale_uniform(factor)
            .map_err(|e| e.with_op("scale_uniform"))?;
        self.mul(&scale)
    }

    /// Right-multiplies a per-axis homogeneous scale onto this matrix.
    pub fn scale_vector(&mut self, factors: &Vector) -> Result<&mut Self> {
        let mut scale = Matrix::with_shape(self.rows(), self.cols());
        scale
            .as_scale_vector(factors)
            .map_err(|e| e.with_op("scale_vector"))?;
        self.mul(&scale)
    }
}
