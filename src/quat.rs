use std::fmt;

use approx::{AbsDiffEq, RelativeEq};

use crate::{dim_check, Error, Matrix, Result, Shape, Vector};

/// A rotation quaternion, stored as a real part and a 3-dimensional imaginary
/// vector.
///
/// Quaternions built by [`Quaternion::from_axis_angle`] and
/// [`Quaternion::set_axis_angle`] are unit length and represent a rotation
/// directly. The remaining operations follow quaternion algebra and do not
/// renormalize; a long chain of [`Quaternion::mul`] calls can drift away from
/// unit length and can be snapped back with [`Quaternion::normalize`].
///
/// # Examples
///
/// ```
/// # use std::f64::consts::FRAC_PI_2;
/// # use approx::assert_relative_eq;
/// # use xform::{Quaternion, Vector};
/// let q = Quaternion::from_axis_angle(&Vector::from([0.0, 0.0, 1.0]), FRAC_PI_2)?;
/// let mut v = Vector::from([1.0, 0.0, 0.0]);
/// q.rotate(&mut v)?;
/// assert_relative_eq!(v, Vector::from([0.0, 1.0, 0.0]), epsilon = 1e-12);
/// # Ok::<(), xform::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct Quaternion {
    t: f64,
    v: Vector,
}

impl Quaternion {
    /// Creates the identity quaternion, which rotates nothing.
    pub fn new() -> Self {
        Self {
            t: 1.0,
            v: Vector::zeros(3),
        }
    }

    /// Creates a quaternion rotating by `angle` radians about `axis`.
    ///
    /// `axis` must have 3 elements and is normalized internally; the zero
    /// vector returns [`Error::RangeInvalid`].
    pub fn from_axis_angle(axis: &Vector, angle: f64) -> Result<Self> {
        let mut this = Self::new();
        this.set_axis_angle(axis, angle)?;
        Ok(this)
    }

    /// Creates a quaternion directly from a real part and a 3-dimensional
    /// imaginary vector.
    pub fn from_parts(t: f64, v: &Vector) -> Result<Self> {
        dim_check(v.shape(), &Shape::rank1(3))?;
        Ok(Self { t, v: v.clone() })
    }

    /// Returns the real part.
    #[inline]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Returns the imaginary vector.
    #[inline]
    pub fn v(&self) -> &Vector {
        &self.v
    }

    /// Replaces this quaternion with a rotation of `angle` radians about
    /// `axis`.
    ///
    /// `axis` must have 3 elements and is normalized internally; the zero
    /// vector returns [`Error::RangeInvalid`].
    pub fn set_axis_angle(&mut self, axis: &Vector, angle: f64) -> Result<&mut Self> {
        dim_check(axis.shape(), &Shape::rank1(3))?;
        let len = axis.magnitude();
        if len == 0.0 {
            return Err(Error::RangeInvalid {
                op: "set_axis_angle",
                what: "axis cannot be the zero vector",
            });
        }
        self.t = (angle / 2.0).cos();
        self.v.set(axis.as_slice())?;
        self.v.scale((angle / 2.0).sin() / len);
        Ok(self)
    }

    /// Like [`Quaternion::set_axis_angle`], but for axes already known to be
    /// unit 3-vectors.
    pub(crate) fn set_unit_axis_angle(&mut self, axis: &Vector, angle: f64) {
        debug_assert_eq!(axis.len(), 3);
        debug_assert!((axis.quadrance() - 1.0).abs() < 1e-9);
        self.t = (angle / 2.0).cos();
        let s = (angle / 2.0).sin();
        self.v[0] = axis[0] * s;
        self.v[1] = axis[1] * s;
        self.v[2] = axis[2] * s;
    }

    /// Computes the Hamilton product `q1 * q2` into a new quaternion.
    ///
    /// The product represents `q2`'s rotation followed by `q1`'s.
    pub fn product(q1: &Quaternion, q2: &Quaternion) -> Quaternion {
        let mut out = q1.clone();
        out.mul(q2);
        out
    }

    /// Multiplies `self` by `other` in place, so that `self` becomes the
    /// Hamilton product `self * other`.
    pub fn mul(&mut self, other: &Quaternion) -> &mut Self {
        let (w, x, y, z) = (self.t, self.v[0], self.v[1], self.v[2]);
        let (ow, ox, oy, oz) = (other.t, other.v[0], other.v[1], other.v[2]);

        self.t = w * ow - x * ox - y * oy - z * oz;
        self.v[0] = w * ox + x * ow + y * oz - z * oy;
        self.v[1] = w * oy - x * oz + y * ow + z * ox;
        self.v[2] = w * oz + x * oy - y * ox + z * ow;
        self
    }

    /// Returns the quadrance (squared length) of this quaternion.
    pub fn quadrance(&self) -> f64 {
        self.t * self.t + self.v.quadrance()
    }

    /// Returns the length of this quaternion.
    pub fn length(&self) -> f64 {
        self.quadrance().sqrt()
    }

    /// Negates the imaginary vector, producing the reverse rotation for unit
    /// quaternions.
    pub fn conjugate(&mut self) -> &mut Self {
        self.v.scale(-1.0);
        self
    }

    /// Replaces this quaternion with its multiplicative inverse, assuming it
    /// is not the zero quaternion.
    pub fn invert(&mut self) -> &mut Self {
        let quad = self.quadrance();
        self.t /= quad;
        self.v.scale(-1.0 / quad);
        self
    }

    /// Divides by the length, making this a unit quaternion. Assumes the
    /// quaternion is not the zero quaternion.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        self.t /= len;
        self.v.scale(1.0 / len);
        self
    }

    /// Rotates `vector` in place by this quaternion's rotation.
    ///
    /// `vector` must have 3 or 4 elements; a fourth (homogeneous) element
    /// passes through untouched. Any other length returns
    /// [`Error::DimensionMismatch`].
    pub fn rotate(&self, vector: &mut Vector) -> Result<()> {
        if vector.len() != 3 && vector.len() != 4 {
            return Err(Error::DimensionMismatch {
                left: vector.shape().clone(),
                right: Shape::rank1(3),
            });
        }
        self.rotate3(vector);
        Ok(())
    }

    /// Rotates the first three elements of `vector` in place.
    pub(crate) fn rotate3(&self, vector: &mut Vector) {
        debug_assert!(vector.len() >= 3);
        let (vx, vy, vz) = (self.v[0], self.v[1], self.v[2]);
        let (px, py, pz) = (vector[0], vector[1], vector[2]);

        // t = 2 v x p, then p' = p + w t + v x t.
        let tx = 2.0 * (vy * pz - vz * py);
        let ty = 2.0 * (vz * px - vx * pz);
        let tz = 2.0 * (vx * py - vy * px);

        vector[0] = px + self.t * tx + (vy * tz - vz * ty);
        vector[1] = py + self.t * ty + (vz * tx - vx * tz);
        vector[2] = pz + self.t * tz + (vx * ty - vy * tx);
    }

    /// Writes this quaternion's rotation into `matrix`.
    ///
    /// `matrix` must be 3×3 or 4×4; any other shape returns
    /// [`Error::DimensionMismatch`]. The 4×4 form is homogeneous, with the
    /// rotation in the upper-left block. Works for non-unit quaternions by
    /// dividing out the quadrance.
    pub fn to_matrix(&self, matrix: &mut Matrix) -> Result<()> {
        let (w, x, y, z) = (self.t, self.v[0], self.v[1], self.v[2]);
        let s = 2.0 / self.quadrance();
        let (xs, ys, zs) = (x * s, y * s, z * s);
        let (wx, wy, wz) = (w * xs, w * ys, w * zs);
        let (xx, xy, xz) = (x * xs, x * ys, x * zs);
        let (yy, yz, zz) = (y * ys, y * zs, z * zs);

        match (matrix.rows(), matrix.cols()) {
            (4, 4) => {
                matrix.identity();
                matrix.set_flat(&[1.0 - (yy + zz), xy - wz, xz + wy], 0)?;
                matrix.set_flat(&[xy + wz, 1.0 - (xx + zz), yz - wx], 4)?;
                matrix.set_flat(&[xz - wy, yz + wx, 1.0 - (xx + yy)], 8)?;
            }
            (3, 3) => {
                matrix.set_flat(&[1.0 - (yy + zz), xy + wz, xz - wy], 0)?;
                matrix.set_flat(&[xy - wz, 1.0 - (xx + zz), yz + wx], 3)?;
                matrix.set_flat(&[xz + wy, yz - wx, 1.0 - (xx + yy)], 6)?;
            }
            _ => {
                return Err(Error::DimensionMismatch {
                    left: matrix.shape().clone(),
                    right: Shape::rank2(4, 4),
                })
            }
        }
        Ok(())
    }

    /// Returns this quaternion's rotation as a new homogeneous 4×4 matrix.
    pub fn to_matrix4(&self) -> Matrix {
        let mut matrix = Matrix::new();
        // The shape is 4x4 by construction.
        let _ = self.to_matrix(&mut matrix);
        matrix
    }

    /// Returns the components in `[t, x, y, z]` order.
    pub fn to_tv_array(&self) -> [f64; 4] {
        [self.t, self.v[0], self.v[1], self.v[2]]
    }

    /// Returns the components in `[x, y, z, t]` order, the layout GLSL-style
    /// shader code usually expects.
    pub fn to_vt_array(&self) -> [f64; 4] {
        [self.v[0], self.v[1], self.v[2], self.t]
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quaternion({}, {:?})", self.t, self.v.as_slice())
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r: {}, i: [ {}, {}, {} ]",
            self.t, self.v[0], self.v[1], self.v[2]
        )
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.t.abs_diff_eq(&other.t, epsilon) && self.v.abs_diff_eq(&other.v, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.t.relative_eq(&other.t, epsilon, max_relative)
            && self.v.relative_eq(&other.v, epsilon, max_relative)
    }
}
