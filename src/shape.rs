use std::fmt;

use tinyvec::TinyVec;

use crate::{Error, Result};

/// The ordered extent of a numeric container.
///
/// A rank-1 shape is a vector length; a rank-2 shape is a matrix's
/// `(rows, columns)` pair. Two shapes are equal when they have the same rank
/// and the same entry at every position.
///
/// Containers in this crate uphold the invariant that their backing storage
/// length always equals [`Shape::elements`]; the shape is only ever changed
/// through operations that resize the storage along with it.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape(TinyVec<[usize; 2]>);

impl Shape {
    /// Creates a rank-1 shape describing a vector of `len` elements.
    pub fn rank1(len: usize) -> Self {
        Self(TinyVec::from(&[len][..]))
    }

    /// Creates a rank-2 shape describing a matrix with `rows` rows and `cols`
    /// columns.
    pub fn rank2(rows: usize, cols: usize) -> Self {
        Self(TinyVec::from(&[rows, cols][..]))
    }

    /// Returns the number of dimensions this shape describes.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Returns the total number of elements a container of this shape holds
    /// (the product of all entries).
    pub fn elements(&self) -> usize {
        self.0.iter().product()
    }

    /// Returns the entries of this shape as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Replaces the entries and the rank of this shape in one step.
    pub fn set(&mut self, dims: &[usize]) {
        self.0.clear();
        self.0.extend_from_slice(dims);
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(TinyVec::from(dims))
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::from(&dims[..])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, "x")?;
            }
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({self})")
    }
}

/// Checks that two shapes are structurally equal.
///
/// This guards every arithmetic entry point that combines two containers. On
/// mismatch it returns [`Error::DimensionMismatch`] carrying both shapes for
/// diagnostics.
///
/// # Examples
///
/// ```
/// # use xform::{dim_check, Shape};
/// assert!(dim_check(&Shape::rank2(4, 4), &Shape::rank2(4, 4)).is_ok());
/// assert!(dim_check(&Shape::rank2(4, 4), &Shape::rank1(16)).is_err());
/// ```
pub fn dim_check(left: &Shape, right: &Shape) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            left: left.clone(),
            right: right.clone(),
        })
    }
}
