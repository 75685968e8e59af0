use std::fmt;

use tinyvec::TinyVec;

use crate::{Error, Result, Shape, Vector};

mod ops;
mod transform;

/// Elements stay inline up to a 4×4, the largest shape rendering code uses
/// per draw call.
type Elems = TinyVec<[f64; 16]>;

/// A matrix of `f64` elements, stored in row-major order.
///
/// The default shape is 4×4, since homogeneous transforms dominate rendering
/// work; [`Matrix::with_shape`] builds any other shape. Freshly constructed
/// matrices hold the delta pattern (ones on the main diagonal, zeros
/// elsewhere), which for square shapes is the identity.
///
/// # In-place and allocating operations
///
/// Following the rest of the crate, arithmetic comes in two flavors:
/// allocating associated functions ([`Matrix::product`]) and in-place methods
/// ([`Matrix::mul`], [`Matrix::transpose`], [`Matrix::invert`]) that mutate
/// the receiver and return `&mut Self` for chaining. In-place operations that
/// need the receiver's old elements copy them into a function-local scratch
/// buffer first, so no operation holds state across calls.
///
/// # Examples
///
/// ```
/// # use xform::{Matrix, Vector};
/// let mut proj = Matrix::new();
/// proj.as_perspective(0.1, 100.0, 1.5, 0.4)?;
/// let mut view = Matrix::new();
/// view.translate(&Vector::from([0.0, 0.0, -5.0]))?;
/// let clip = Matrix::product(&proj, &view)?;
/// # let _ = clip;
/// # Ok::<(), xform::Error>(())
/// ```
#[derive(Clone)]
pub struct Matrix {
    shape: Shape,
    elems: Elems,
}

impl Matrix {
    /// Creates a 4×4 identity matrix.
    pub fn new() -> Self {
        Self::with_shape(4, 4)
    }

    /// Creates a `rows`×`cols` matrix holding the delta pattern: ones where
    /// the row and column index agree, zeros elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Matrix;
    /// let m = Matrix::with_shape(2, 3);
    /// assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    /// ```
    pub fn with_shape(rows: usize, cols: usize) -> Self {
        let mut elems = Elems::new();
        elems.resize(rows * cols, 0.0);
        let mut this = Self {
            shape: Shape::rank2(rows, cols),
            elems,
        };
        this.identity();
        this
    }

    /// Creates a `rows`×`cols` matrix from a row-major slice of elements.
    ///
    /// `values` must hold exactly `rows * cols` elements.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                left: Shape::rank1(values.len()),
                right: Shape::rank2(rows, cols),
            });
        }
        Ok(Self {
            shape: Shape::rank2(rows, cols),
            elems: Elems::from(values),
        })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.as_slice()[0]
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.as_slice()[1]
    }

    /// Returns the shape of this matrix (always rank 2).
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.elems
    }

    /// Returns the elements in row-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.elems
    }

    /// Copies the elements into a plain row-major `Vec`.
    pub fn to_vec(&self) -> Vec<f64> {
        self.elems.to_vec()
    }

    /// Returns the element at `row`, `col` (zero-based), or `None` when
    /// either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows() && col < self.cols() {
            Some(self.elems[row * self.cols() + col])
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at `row`, `col`
    /// (zero-based), or `None` when either index is out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.rows() && col < self.cols() {
            let cols = self.cols();
            Some(&mut self.elems[row * cols + col])
        } else {
            None
        }
    }

    /// Writes `value` at `row`, `col` (zero-based).
    ///
    /// Returns [`Error::InvalidArgument`] when either index is out of bounds.
    pub fn set_entry(&mut self, row: usize, col: usize, value: f64) -> Result<&mut Self> {
        match self.get_mut(row, col) {
            Some(entry) => {
                *entry = value;
                Ok(self)
            }
            None => Err(Error::InvalidArgument {
                op: "set_entry",
                what: "entry index out of bounds",
            }),
        }
    }

    /// Copies `values` into the row-major storage starting at flat index
    /// `offset`.
    ///
    /// Returns [`Error::InvalidArgument`] when the copy would run past the end
    /// of the storage.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Matrix;
    /// let mut m = Matrix::with_shape(2, 2);
    /// m.set_flat(&[5.0, 6.0], 2)?;
    /// assert_eq!(m.as_slice(), &[1.0, 0.0, 5.0, 6.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn set_flat(&mut self, values: &[f64], offset: usize) -> Result<&mut Self> {
        let end = offset + values.len();
        if end > self.elems.len() {
            return Err(Error::InvalidArgument {
                op: "set_flat",
                what: "values run past the end of the matrix storage",
            });
        }
        self.elems[offset..end].copy_from_slice(values);
        Ok(self)
    }

    /// Resets this matrix to the delta pattern, keeping its shape.
    pub fn identity(&mut self) -> &mut Self {
        let cols = self.cols();
        for (i, elem) in self.elems.iter_mut().enumerate() {
            *elem = if i / cols == i % cols { 1.0 } else { 0.0 };
        }
        self
    }

    /// Sets every element to zero, keeping the shape.
    pub fn zero(&mut self) -> &mut Self {
        self.elems.iter_mut().for_each(|e| *e = 0.0);
        self
    }

    /// Computes the matrix product `a * b` into a new matrix.
    ///
    /// `a`'s column count must equal `b`'s row count; the result has `a`'s
    /// rows and `b`'s columns.
    pub fn product(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let mut out = a.clone();
        out.mul(b)?;
        Ok(out)
    }

    /// Multiplies `self` by `other` in place, so that `self` becomes
    /// `self * other`.
    ///
    /// The receiver's shape changes to `self.rows()`×`other.cols()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Matrix;
    /// let mut a = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
    /// let b = Matrix::from_flat(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0])?;
    /// a.mul(&b)?;
    /// assert_eq!(a.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn mul(&mut self, other: &Matrix) -> Result<&mut Self> {
        if self.cols() != other.rows() {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }
        let (m, n, p) = (self.rows(), self.cols(), other.cols());
        let scratch = self.elems.clone();
        self.shape.set(&[m, p]);
        self.elems.resize(m * p, 0.0);
        for i in 0..m {
            for j in 0..p {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += scratch[i * n + k] * other.elems[k * p + j];
                }
                self.elems[i * p + j] = sum;
            }
        }
        Ok(self)
    }

    /// Multiplies this matrix by a column vector, producing a new vector with
    /// as many elements as this matrix has rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::{Matrix, Vector};
    /// let m = Matrix::with_shape(2, 2);
    /// assert_eq!(m.mul_vector(&Vector::from([2.0, 3.0]))?, [2.0, 3.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn mul_vector(&self, vector: &Vector) -> Result<Vector> {
        if self.cols() != vector.len() {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: vector.shape().clone(),
            });
        }
        let (m, n) = (self.rows(), self.cols());
        let mut out = Vector::zeros(m);
        for i in 0..m {
            let mut sum = 0.0;
            for k in 0..n {
                sum += self.elems[i * n + k] * vector[k];
            }
            out[i] = sum;
        }
        Ok(out)
    }

    /// Transposes this matrix in place. Non-square matrices swap their row and
    /// column counts.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Matrix;
    /// let mut m = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
    /// m.transpose();
    /// assert_eq!(m.shape(), &[3, 2].into());
    /// assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn transpose(&mut self) -> &mut Self {
        let (m, n) = (self.rows(), self.cols());
        let scratch = self.elems.clone();
        self.shape.set(&[n, m]);
        for i in 0..n {
            for j in 0..m {
                self.elems[i * m + j] = scratch[j * n + i];
            }
        }
        self
    }

    /// Computes the determinant of this square matrix.
    ///
    /// Shapes up to 4×4 use closed-form expressions; larger shapes expand
    /// cofactors along the first row.
    ///
    /// Returns [`Error::DimensionMismatch`] for a non-square matrix, with the
    /// expected square shape on the right.
    pub fn det(&self) -> Result<f64> {
        let m = self.rows();
        if self.cols() != m {
            return Err(Error::DimensionMismatch {
                left: self.shape.clone(),
                right: Shape::rank2(m, m),
            });
        }
        let e = &self.elems;
        Ok(match m {
            0 => 1.0,
            1 => e[0],
            2 => e[0] * e[3] - e[1] * e[2],
            3 => {
                e[0] * (e[4] * e[8] - e[5] * e[7]) - e[1] * (e[3] * e[8] - e[5] * e[6])
                    + e[2] * (e[3] * e[7] - e[4] * e[6])
            }
            4 => {
                let s0 = e[0] * e[5] - e[1] * e[4];
                let s1 = e[0] * e[6] - e[2] * e[4];
                let s2 = e[0] * e[7] - e[3] * e[4];
                let s3 = e[1] * e[6] - e[2] * e[5];
                let s4 = e[1] * e[7] - e[3] * e[5];
                let s5 = e[2] * e[7] - e[3] * e[6];
                let c5 = e[10] * e[15] - e[11] * e[14];
                let c4 = e[9] * e[15] - e[11] * e[13];
                let c3 = e[9] * e[14] - e[10] * e[13];
                let c2 = e[8] * e[15] - e[11] * e[12];
                let c1 = e[8] * e[14] - e[10] * e[12];
                let c0 = e[8] * e[13] - e[9] * e[12];
                s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
            }
            _ => {
                let mut det = 0.0;
                let mut sign = 1.0;
                for j in 0..m {
                    det += sign * e[j] * self.minor(0, j)?.det()?;
                    sign = -sign;
                }
                det
            }
        })
    }

    /// Returns the submatrix obtained by deleting row `row` and column `col`
    /// (zero-based).
    ///
    /// Returns [`Error::InvalidArgument`] when either index is out of bounds
    /// or the matrix has only one row or column left to delete.
    pub fn minor(&self, row: usize, col: usize) -> Result<Matrix> {
        let (m, n) = (self.rows(), self.cols());
        if m < 2 || n < 2 {
            return Err(Error::InvalidArgument {
                op: "minor",
                what: "matrix has no submatrix to shrink to",
            });
        }
        if row >= m || col >= n {
            return Err(Error::InvalidArgument {
                op: "minor",
                what: "deleted row or column out of bounds",
            });
        }
        let mut elems = Elems::new();
        for i in 0..m {
            if i == row {
                continue;
            }
            for j in 0..n {
                if j == col {
                    continue;
                }
                elems.push(self.elems[i * n + j]);
            }
        }
        Ok(Matrix {
            shape: Shape::rank2(m - 1, n - 1),
            elems,
        })
    }

    /// Computes the inverse of this square matrix into a new matrix.
    ///
    /// 2×2 matrices use the closed-form inverse; larger shapes divide the
    /// transposed cofactor matrix by the determinant.
    ///
    /// Returns [`Error::Singular`] when the determinant is zero, and
    /// [`Error::DimensionMismatch`] for a non-square matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Matrix;
    /// # use approx::assert_relative_eq;
    /// let m = Matrix::from_flat(2, 2, &[4.0, 7.0, 2.0, 6.0])?;
    /// let inv = m.inverted()?;
    /// assert_relative_eq!(Matrix::product(&m, &inv)?, Matrix::with_shape(2, 2), epsilon = 1e-12);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn inverted(&self) -> Result<Matrix> {
        let det = self.det()?;
        log::trace!("invert: det = {det}");
        if det == 0.0 {
            return Err(Error::Singular);
        }
        let m = self.rows();
        let e = &self.elems;
        if m == 1 {
            return Matrix::from_flat(1, 1, &[1.0 / det]);
        }
        if m == 2 {
            return Matrix::from_flat(2, 2, &[e[3] / det, -e[1] / det, -e[2] / det, e[0] / det]);
        }
        let mut cof = Matrix::with_shape(m, m);
        for i in 0..m {
            for j in 0..m {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                cof.elems[i * m + j] = sign * self.minor(i, j)?.det()?;
            }
        }
        cof.transpose();
        cof.elems.iter_mut().for_each(|e| *e /= det);
        Ok(cof)
    }

    /// Replaces this matrix with its inverse.
    pub fn invert(&mut self) -> Result<&mut Self> {
        *self = self.inverted()?;
        Ok(self)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({:?}, {:?})", self.shape, self.as_slice())
    }
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn default_is_4x4_identity() {
        let m = Matrix::new();
        assert_eq!(m.shape(), &Shape::rank2(4, 4));
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), Some(if i == j { 1.0 } else { 0.0 }));
            }
        }
    }

    #[test]
    fn with_shape_holds_delta_pattern() {
        let m = Matrix::with_shape(3, 2);
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn from_flat_checks_element_count() {
        let m = Matrix::from_flat(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(
            Matrix::from_flat(2, 2, &[1.0, 2.0, 3.0]).unwrap_err(),
            Error::DimensionMismatch {
                left: Shape::rank1(3),
                right: Shape::rank2(2, 2),
            }
        );
    }

    #[test]
    fn entry_access() {
        let mut m = Matrix::with_shape(2, 3);
        m.set_entry(1, 2, 7.0).unwrap();
        assert_eq!(m.get(1, 2), Some(7.0));
        assert_eq!(m.get(2, 0), None);
        assert!(m.set_entry(0, 3, 1.0).is_err());
    }

    #[test]
    fn set_flat_bounds() {
        let mut m = Matrix::with_shape(2, 2);
        m.set_flat(&[9.0, 8.0], 1).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 9.0, 8.0, 1.0]);
        assert_eq!(
            m.set_flat(&[1.0, 2.0], 3).unwrap_err(),
            Error::InvalidArgument {
                op: "set_flat",
                what: "values run past the end of the matrix storage",
            }
        );
    }

    #[test]
    fn mul_reshapes_receiver() {
        let mut a = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_flat(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        a.mul(&b).unwrap();
        assert_eq!(a.shape(), &Shape::rank2(2, 2));
        assert_eq!(a.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn mul_rejects_inner_dimension_mismatch() {
        let mut a = Matrix::with_shape(2, 3);
        let before = a.clone();
        assert_eq!(
            a.mul(&Matrix::with_shape(2, 2)).unwrap_err(),
            Error::DimensionMismatch {
                left: Shape::rank2(2, 3),
                right: Shape::rank2(2, 2),
            }
        );
        // The failed multiply left the receiver untouched.
        assert_eq!(a, before);
    }

    #[test]
    fn product_leaves_operands_alone() {
        let a = Matrix::from_flat(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let b = Matrix::from_flat(2, 2, &[2.0, 0.0, 0.0, 3.0]).unwrap();
        let c = Matrix::product(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[0.0, 3.0, 2.0, 0.0]);
        assert_eq!(a.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn mul_vector() {
        let m = Matrix::with_shape(2, 2);
        assert_eq!(m.mul_vector(&Vector::from([2.0, 3.0])).unwrap(), [2.0, 3.0]);

        let m = Matrix::from_flat(2, 3, &[1.0, 0.0, 2.0, 0.0, 1.0, -1.0]).unwrap();
        let v = Vector::from([3.0, 4.0, 5.0]);
        assert_eq!(m.mul_vector(&v).unwrap(), [13.0, -1.0]);
        assert!(m.mul_vector(&Vector::zeros(2)).is_err());
    }

    #[test]
    fn transpose_is_an_involution() {
        let m = Matrix::from_flat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut t = m.clone();
        t.transpose();
        assert_eq!(t.shape(), &Shape::rank2(3, 2));
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        t.transpose();
        assert_eq!(t, m);
    }

    #[test]
    fn det_closed_forms() {
        assert_eq!(Matrix::with_shape(1, 1).det().unwrap(), 1.0);
        assert_eq!(Matrix::new().det().unwrap(), 1.0);
        assert_eq!(Matrix::new().zero().det().unwrap(), 0.0);

        let m = Matrix::from_flat(2, 2, &[3.0, 8.0, 4.0, 6.0]).unwrap();
        assert_eq!(m.det().unwrap(), -14.0);

        let m = Matrix::from_flat(3, 3, &[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]).unwrap();
        assert_eq!(m.det().unwrap(), -306.0);
    }

    #[test]
    fn det_expands_cofactors_beyond_4x4() {
        assert_eq!(Matrix::with_shape(5, 5).det().unwrap(), 1.0);
        assert_eq!(Matrix::with_shape(5, 5).zero().det().unwrap(), 0.0);

        // Upper-triangular, so the determinant is the product of the diagonal.
        let mut m = Matrix::with_shape(5, 5);
        for i in 0..5 {
            m.set_entry(i, i, (i + 1) as f64).unwrap();
            for j in (i + 1)..5 {
                m.set_entry(i, j, 1.0).unwrap();
            }
        }
        assert_relative_eq!(m.det().unwrap(), 120.0, max_relative = 1e-12);
    }

    #[test]
    fn det_requires_square() {
        assert_eq!(
            Matrix::with_shape(2, 3).det().unwrap_err(),
            Error::DimensionMismatch {
                left: Shape::rank2(2, 3),
                right: Shape::rank2(2, 2),
            }
        );
    }

    #[test]
    fn minor_deletes_row_and_column() {
        let m = Matrix::from_flat(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        let minor = m.minor(1, 0).unwrap();
        assert_eq!(minor.shape(), &Shape::rank2(2, 2));
        assert_eq!(minor.as_slice(), &[2.0, 3.0, 8.0, 9.0]);
        assert!(m.minor(3, 0).is_err());
        assert!(Matrix::with_shape(1, 1).minor(0, 0).is_err());
    }

    #[test]
    fn invert_2x2_exact() {
        init_logger();
        let m = Matrix::from_flat(2, 2, &[2.0, 0.5, 5.0 / 3.0, 5.0 / 6.0]).unwrap();
        let inv = m.inverted().unwrap();
        assert_relative_eq!(
            inv,
            Matrix::from_flat(2, 2, &[1.0, -0.6, -2.0, 2.4]).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn invert_leaves_the_identity_unchanged() {
        let mut m = Matrix::new();
        m.invert().unwrap();
        assert_eq!(m, Matrix::new());
    }

    #[test]
    fn invert_1x1_is_the_reciprocal() {
        let m = Matrix::from_flat(1, 1, &[4.0]).unwrap();
        assert_eq!(m.inverted().unwrap().as_slice(), &[0.25]);
    }

    #[test]
    fn invert_rejects_singular() {
        let m = Matrix::from_flat(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(m.inverted().unwrap_err(), Error::Singular);

        let mut zero = Matrix::new();
        zero.zero();
        assert_eq!(zero.invert().unwrap_err(), Error::Singular);
    }

    #[test]
    fn invert_is_an_involution() {
        init_logger();
        let mut rng = fastrand::Rng::with_seed(0x7d5a_34c1);
        for &size in &[3, 4] {
            for _ in 0..50 {
                let values: Vec<f64> = (0..size * size).map(|_| rng.f64() * 2.0 - 1.0).collect();
                let m = Matrix::from_flat(size, size, &values).unwrap();
                let det = m.det().unwrap();
                if det.abs() < 1e-3 {
                    continue;
                }
                let roundtrip = m.inverted().unwrap().inverted().unwrap();
                assert_relative_eq!(roundtrip, m, epsilon = 1e-9, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn invert_undoes_multiplication() {
        let m = Matrix::from_flat(
            3,
            3,
            &[2.0, 0.0, 1.0, 0.0, 3.0, -1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let product = Matrix::product(&m, &m.inverted().unwrap()).unwrap();
        assert_relative_eq!(
            product,
            Matrix::with_shape(3, 3),
            epsilon = 1e-12,
            max_relative = 1e-12
        );
    }
}
