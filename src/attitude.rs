use std::fmt;

use crate::{Error, Matrix, Quaternion, Result, Shape, Vector};

/// An orientation tracked as three orthonormal basis vectors, rotated
/// incrementally by pitch, yaw, and roll steps.
///
/// The basis starts out as the standard axes: `cross` (lateral) along x, `up`
/// (normal) along y, and `look` (longitudinal) along z. Each rotation step
/// spins the two other basis vectors about the pivot axis with a quaternion,
/// so the pivot itself never moves and the basis stays orthonormal up to
/// floating-point rounding.
///
/// # Examples
///
/// ```
/// # use std::f64::consts::FRAC_PI_2;
/// # use approx::assert_relative_eq;
/// # use xform::{Attitude, Vector};
/// let mut att = Attitude::new();
/// att.yaw(FRAC_PI_2);
/// assert_relative_eq!(att.look(), &Vector::from([-1.0, 0.0, 0.0]), epsilon = 1e-12);
/// assert_relative_eq!(att.up(), &Vector::from([0.0, 1.0, 0.0]), epsilon = 1e-12);
/// ```
#[derive(Clone, PartialEq)]
pub struct Attitude {
    cross: Vector,
    up: Vector,
    look: Vector,
}

impl Attitude {
    /// Creates an attitude aligned with the standard axes.
    pub fn new() -> Self {
        Self {
            cross: Vector::from([1.0, 0.0, 0.0]),
            up: Vector::from([0.0, 1.0, 0.0]),
            look: Vector::from([0.0, 0.0, 1.0]),
        }
    }

    /// Returns the lateral axis.
    #[inline]
    pub fn cross(&self) -> &Vector {
        &self.cross
    }

    /// Returns the normal axis.
    #[inline]
    pub fn up(&self) -> &Vector {
        &self.up
    }

    /// Returns the longitudinal axis.
    #[inline]
    pub fn look(&self) -> &Vector {
        &self.look
    }

    /// Pitches by `theta` radians about the lateral axis, tilting `up` and
    /// `look`.
    pub fn pitch(&mut self, theta: f64) -> &mut Self {
        log::trace!("pitch by {theta}");
        let mut quat = Quaternion::new();
        quat.set_unit_axis_angle(&self.cross, -theta);
        quat.rotate3(&mut self.up);
        quat.rotate3(&mut self.look);
        self
    }

    /// Yaws by `theta` radians about the normal axis, turning `cross` and
    /// `look`.
    pub fn yaw(&mut self, theta: f64) -> &mut Self {
        log::trace!("yaw by {theta}");
        let mut quat = Quaternion::new();
        quat.set_unit_axis_angle(&self.up, -theta);
        quat.rotate3(&mut self.cross);
        quat.rotate3(&mut self.look);
        self
    }

    /// Rolls by `theta` radians about the longitudinal axis, banking `cross`
    /// and `up`.
    pub fn roll(&mut self, theta: f64) -> &mut Self {
        log::trace!("roll by {theta}");
        let mut quat = Quaternion::new();
        quat.set_unit_axis_angle(&self.look, -theta);
        quat.rotate3(&mut self.cross);
        quat.rotate3(&mut self.up);
        self
    }

    /// Writes this attitude into `matrix` as a change-of-basis matrix, with
    /// the basis vectors as its leading rows.
    ///
    /// `matrix` must be 3×3 or 4×4; any other shape returns
    /// [`Error::DimensionMismatch`]. The 4×4 form is homogeneous.
    pub fn to_matrix(&self, matrix: &mut Matrix) -> Result<()> {
        match (matrix.rows(), matrix.cols()) {
            (3, 3) | (4, 4) => {
                matrix.identity();
                matrix.set_flat(self.cross.as_slice(), 0)?;
                matrix.set_flat(self.up.as_slice(), matrix.cols())?;
                matrix.set_flat(self.look.as_slice(), 2 * matrix.cols())?;
                Ok(())
            }
            _ => Err(Error::DimensionMismatch {
                left: matrix.shape().clone(),
                right: Shape::rank2(4, 4),
            }),
        }
    }

    /// Returns this attitude as a new homogeneous 4×4 matrix.
    pub fn to_matrix4(&self) -> Matrix {
        let mut matrix = Matrix::new();
        // The shape is 4x4 by construction.
        let _ = self.to_matrix(&mut matrix);
        matrix
    }

    /// Right-multiplies this attitude's change-of-basis matrix onto `matrix`.
    ///
    /// `matrix` must be 3×3 or 4×4.
    pub fn rotate(&self, matrix: &mut Matrix) -> Result<()> {
        let mut basis = Matrix::with_shape(matrix.rows(), matrix.cols());
        self.to_matrix(&mut basis)?;
        matrix.mul(&basis)?;
        Ok(())
    }
}

impl Default for Attitude {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attitude")
            .field("cross", &self.cross)
            .field("up", &self.up)
            .field("look", &self.look)
            .finish()
    }
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n {}\n {}", self.cross, self.up, self.look)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_relative_eq;

    use super::*;

    const LOG: bool = false;

    fn init_logger() {
        if LOG {
            env_logger::builder()
                .filter_module(env!("CARGO_CRATE_NAME"), log::LevelFilter::Trace)
                .try_init()
                .ok();
        }
    }

    fn assert_orthonormal(att: &Attitude) {
        assert_relative_eq!(att.cross().magnitude(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(att.up().magnitude(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(att.look().magnitude(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(att.cross().dot(att.up()).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(att.cross().dot(att.look()).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(att.up().dot(att.look()).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn starts_on_the_standard_axes() {
        let att = Attitude::new();
        assert_eq!(att.cross(), &[1.0, 0.0, 0.0]);
        assert_eq!(att.up(), &[0.0, 1.0, 0.0]);
        assert_eq!(att.look(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn pitch_keeps_the_lateral_axis_fixed() {
        init_logger();
        let mut att = Attitude::new();
        att.pitch(FRAC_PI_2);
        assert_eq!(att.cross(), &[1.0, 0.0, 0.0]);
        assert_relative_eq!(att.up(), &Vector::from([0.0, 0.0, -1.0]), epsilon = 1e-12);
        assert_relative_eq!(att.look(), &Vector::from([0.0, 1.0, 0.0]), epsilon = 1e-12);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let mut att = Attitude::new();
        att.pitch(0.7).yaw(-0.3).roll(1.1);
        att.roll(-1.1).yaw(0.3).pitch(-0.7);
        assert_relative_eq!(att.cross(), Attitude::new().cross(), epsilon = 1e-12);
        assert_relative_eq!(att.up(), Attitude::new().up(), epsilon = 1e-12);
        assert_relative_eq!(att.look(), Attitude::new().look(), epsilon = 1e-12);
    }

    #[test]
    fn stays_orthonormal_under_many_rotations() {
        init_logger();
        let mut rng = fastrand::Rng::with_seed(0x2f61_9be4);
        let mut att = Attitude::new();
        for _ in 0..500 {
            let theta = (rng.f64() - 0.5) * TAU;
            match rng.u8(0..3) {
                0 => att.pitch(theta),
                1 => att.yaw(theta),
                _ => att.roll(theta),
            };
        }
        assert_orthonormal(&att);
    }

    #[test]
    fn to_matrix_lays_the_basis_out_as_rows() {
        let mut att = Attitude::new();
        att.yaw(FRAC_PI_2);

        let mut three = Matrix::with_shape(3, 3);
        att.to_matrix(&mut three).unwrap();
        for j in 0..3 {
            assert_eq!(three.get(0, j), Some(att.cross()[j]));
            assert_eq!(three.get(1, j), Some(att.up()[j]));
            assert_eq!(three.get(2, j), Some(att.look()[j]));
        }

        let four = att.to_matrix4();
        assert_eq!(four.get(3, 3), Some(1.0));
        assert_eq!(four.get(0, 3), Some(0.0));
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(four.get(i, j), three.get(i, j));
            }
        }

        assert!(att.to_matrix(&mut Matrix::with_shape(2, 2)).is_err());
    }

    #[test]
    fn rotate_multiplies_the_basis_onto_a_matrix() {
        let mut att = Attitude::new();
        att.roll(0.4).pitch(-0.2);

        let mut m = Matrix::new();
        att.rotate(&mut m).unwrap();
        assert_eq!(m, att.to_matrix4());

        assert!(att.rotate(&mut Matrix::with_shape(2, 2)).is_err());
    }

    #[test]
    fn display_lists_the_basis_vectors() {
        let att = Attitude::new();
        assert_eq!(
            att.to_string(),
            "( 1, 0, 0 )\n ( 0, 1, 0 )\n ( 0, 0, 1 )"
        );
    }
}
