use std::fmt;
use std::ops::{Index, IndexMut};

use approx::{AbsDiffEq, RelativeEq};

use super::Matrix;

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        let cols = self.cols();
        assert!(row < self.rows() && col < cols);
        &self.elems[row * cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        let cols = self.cols();
        assert!(row < self.rows() && col < cols);
        &mut self.elems[row * cols + col]
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.elems == other.elems
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.shape == other.shape
            && self
                .elems
                .iter()
                .zip(&other.elems)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.shape == other.shape
            && self
                .elems
                .iter()
                .zip(&other.elems)
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// Rows are separated by newlines and elements within a row by single spaces.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.cols();
        for (i, elem) in self.elems.iter().enumerate() {
            if i != 0 {
                write!(f, "{}", if i % cols == 0 { '\n' } else { ' ' })?;
            }
            write!(f, "{elem}")?;
        }
        Ok(())
    }
}
