use std::fmt;

use tinyvec::TinyVec;

use crate::{dim_check, Error, Result, Scalar, Shape};

mod ops;

/// Elements stay inline up to 4 dimensions, the largest size rendering code
/// uses per vertex.
type Elems = TinyVec<[f64; 4]>;

/// A fixed-length vector of `f64` elements.
///
/// # Construction
///
/// - [`Vector::zeros`] creates a zero-filled vector of an explicit length.
/// - The [`From`] impls create a vector from an array, slice, or `Vec` of
///   values.
///
/// A vector's length is fixed at construction; arithmetic methods mutate the
/// elements in place and never resize.
///
/// # Element Access
///
/// Elements can be read and written through the [`Index`]/[`IndexMut`] impls,
/// or as a slice via [`Vector::as_slice`] and [`Vector::as_mut_slice`].
/// [`Vector::to_vec`] produces a plain buffer decoupled from the vector.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone)]
pub struct Vector {
    shape: Shape,
    elems: Elems,
}

impl Vector {
    /// Creates a zero-filled vector of the given length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let v = Vector::zeros(3);
    /// assert_eq!(v, [0.0, 0.0, 0.0]);
    /// ```
    pub fn zeros(len: usize) -> Self {
        let mut elems = Elems::new();
        elems.resize(len, 0.0);
        Self {
            shape: Shape::rank1(len),
            elems,
        }
    }

    /// Creates a vector from a slice of values.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            shape: Shape::rank1(values.len()),
            elems: Elems::from(values),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns `true` if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Returns the shape of this vector (always rank 1).
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.elems
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.elems
    }

    /// Copies the elements into a plain `Vec`, decoupled from this vector.
    pub fn to_vec(&self) -> Vec<f64> {
        self.elems.to_vec()
    }

    /// Sets every element to zero, keeping the length.
    pub fn zero(&mut self) -> &mut Self {
        self.elems.iter_mut().for_each(|e| *e = 0.0);
        self
    }

    /// Replaces all elements with `values`, which must have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let mut v = Vector::zeros(2);
    /// v.set(&[4.0, 5.0])?;
    /// assert_eq!(v, [4.0, 5.0]);
    /// assert!(v.set(&[1.0, 2.0, 3.0]).is_err());
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn set(&mut self, values: &[f64]) -> Result<&mut Self> {
        dim_check(&self.shape, &Shape::rank1(values.len()))?;
        self.elems.copy_from_slice(values);
        Ok(self)
    }

    /// Computes the dot product of `self` and `other`.
    ///
    /// Both vectors must have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let a = Vector::from([1.0, 3.0, -5.0]);
    /// let b = Vector::from([4.0, -2.0, -1.0]);
    /// assert_eq!(a.dot(&b)?, 3.0);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        dim_check(&self.shape, &other.shape)?;
        Ok(self
            .elems
            .iter()
            .zip(&other.elems)
            .fold(0.0, |acc, (a, b)| acc + a * b))
    }

    /// Computes the cross product of `self` and `other`.
    ///
    /// Only defined for 3-dimensional vectors. The result is perpendicular to
    /// both inputs; swapping the arguments inverts its direction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let x = Vector::from([1.0, 0.0, 0.0]);
    /// let y = Vector::from([0.0, 1.0, 0.0]);
    /// assert_eq!(x.cross(&y)?, [0.0, 0.0, 1.0]);
    /// assert_eq!(y.cross(&x)?, [0.0, 0.0, -1.0]);
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn cross(&self, other: &Vector) -> Result<Vector> {
        let three = Shape::rank1(3);
        dim_check(&self.shape, &three)?;
        dim_check(&other.shape, &three)?;

        let a = &self.elems;
        let b = &other.elems;
        Ok(Vector::from([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]))
    }

    /// Returns the quadrance (squared length) of this vector.
    pub fn quadrance(&self) -> f64 {
        self.elems.iter().fold(0.0, |acc, e| acc + e * e)
    }

    /// Returns the generalized inner product of `self` and `other` (the sum of
    /// element-wise products).
    ///
    /// `v.quadrance_with(&v)` equals [`Vector::quadrance`].
    pub fn quadrance_with(&self, other: &Vector) -> Result<f64> {
        self.dot(other)
    }

    /// Returns the length of this vector.
    pub fn magnitude(&self) -> f64 {
        self.quadrance().sqrt()
    }

    /// Adds `other` to `self` element-wise, in place.
    ///
    /// Both vectors must have the same length.
    pub fn add(&mut self, other: &Vector) -> Result<&mut Self> {
        dim_check(&self.shape, &other.shape)?;
        self.elems
            .iter_mut()
            .zip(&other.elems)
            .for_each(|(a, b)| *a += b);
        Ok(self)
    }

    /// Multiplies every element by `scalar`, in place.
    pub fn scale(&mut self, scalar: f64) -> &mut Self {
        self.elems.iter_mut().for_each(|e| *e *= scalar);
        self
    }

    /// Divides every element by the vector's magnitude, making it unit-length.
    ///
    /// Returns [`Error::RangeInvalid`] when the magnitude is zero; the zero
    /// vector has no direction to preserve.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let mut v = Vector::from([0.0, 0.0, 4.0]);
    /// v.normalize()?;
    /// assert_eq!(v, [0.0, 0.0, 1.0]);
    ///
    /// assert!(Vector::zeros(3).normalize().is_err());
    /// # Ok::<(), xform::Error>(())
    /// ```
    pub fn normalize(&mut self) -> Result<&mut Self> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(Error::RangeInvalid {
                op: "normalize",
                what: "cannot normalize a zero-magnitude vector",
            });
        }
        self.elems.iter_mut().for_each(|e| *e /= mag);
        Ok(self)
    }

    /// Concatenates a sequence of vectors into one contiguous buffer of a
    /// caller-chosen numeric representation.
    ///
    /// This is the interface rendering code uses to build GPU-uploadable
    /// buffers: positions, normals, and colors computed in `f64` are flattened
    /// to `f32` once, at the upload boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use xform::Vector;
    /// let positions = [Vector::from([1.0, 2.0]), Vector::from([3.0, 4.0])];
    /// let buf: Vec<f32> = Vector::flatten(&positions);
    /// assert_eq!(buf, [1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn flatten<S: Scalar>(vectors: &[Vector]) -> Vec<S> {
        let len = vectors.iter().map(Vector::len).sum();
        let mut out = Vec::with_capacity(len);
        for vector in vectors {
            out.extend(vector.elems.iter().map(|&e| S::from_f64(e)));
        }
        out
    }
}

impl From<&[f64]> for Vector {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(values: [f64; N]) -> Self {
        Self::from_slice(&values)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_slice(&values)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector").field(&self.as_slice()).finish()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( ")?;
        for (i, elem) in self.elems.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{elem}")?;
        }
        write!(f, " )")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn dot() {
        let a = Vector::from([1.0, 3.0, -5.0]);
        let b = Vector::from([4.0, -2.0, -1.0]);
        assert_eq!(a.dot(&b).unwrap(), 3.0);
        // Symmetric in its arguments.
        assert_eq!(b.dot(&a).unwrap(), 3.0);
        assert_eq!(a.dot(&a).unwrap(), 35.0);
    }

    #[test]
    fn dot_rejects_mismatched_lengths() {
        let a = Vector::from([1.0, 2.0]);
        let b = Vector::from([1.0, 2.0, 3.0]);
        assert_eq!(
            a.dot(&b).unwrap_err(),
            Error::DimensionMismatch {
                left: Shape::rank1(2),
                right: Shape::rank1(3),
            }
        );
    }

    #[test]
    fn cross_is_anticommutative() {
        let a = Vector::from([2.0, -1.0, 0.5]);
        let b = Vector::from([-3.0, 4.0, 1.0]);
        let mut ba = b.cross(&a).unwrap();
        assert_eq!(a.cross(&b).unwrap(), *ba.scale(-1.0));
    }

    #[test]
    fn cross_requires_three_dimensions() {
        let a = Vector::from([1.0, 2.0]);
        let b = Vector::from([1.0, 2.0, 3.0]);
        assert!(a.cross(&b).is_err());
        assert!(b.cross(&a).is_err());
    }

    #[test]
    fn magnitude_and_quadrance() {
        let v = Vector::from([3.0, 4.0]);
        assert_eq!(v.quadrance(), 25.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.quadrance_with(&v).unwrap(), v.quadrance());
        assert!(Vector::zeros(4).magnitude() >= 0.0);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let mut v = Vector::from([1.0, -2.0, 2.5, 0.25]);
        v.normalize().unwrap();
        assert_relative_eq!(v.magnitude(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn normalize_rejects_zero_vector() {
        assert_eq!(
            Vector::zeros(3).normalize().unwrap_err(),
            Error::RangeInvalid {
                op: "normalize",
                what: "cannot normalize a zero-magnitude vector",
            }
        );
    }

    #[test]
    fn add_and_scale_chain() {
        let mut v = Vector::from([1.0, 2.0]);
        v.add(&Vector::from([3.0, 4.0])).unwrap().scale(2.0);
        assert_eq!(v, [8.0, 12.0]);

        assert!(v.add(&Vector::zeros(3)).is_err());
        // The failed add left the receiver untouched.
        assert_eq!(v, [8.0, 12.0]);
    }

    #[test]
    fn set_checks_length() {
        let mut v = Vector::zeros(3);
        v.set(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
        assert!(v.set(&[1.0]).is_err());
    }

    #[test]
    fn to_vec_is_decoupled() {
        let mut v = Vector::from([1.0, 2.0]);
        let plain = v.to_vec();
        v.scale(10.0);
        assert_eq!(plain, [1.0, 2.0]);
    }

    #[test]
    fn flatten() {
        let vectors = [
            Vector::from([1.0, 2.0, 3.0]),
            Vector::from([4.0, 5.0, 6.0]),
        ];
        let f64s: Vec<f64> = Vector::flatten(&vectors);
        assert_eq!(f64s, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let f32s: Vec<f32> = Vector::flatten(&vectors);
        assert_eq!(f32s, [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn fmt() {
        let v = Vector::from([1.0, 2.5, -3.0]);
        assert_eq!(v.to_string(), "( 1, 2.5, -3 )");
        assert_eq!(format!("{v:?}"), "Vector([1.0, 2.5, -3.0])");
    }
}
