use std::ops::{Index, IndexMut};

use approx::{AbsDiffEq, RelativeEq};

use super::Vector;

impl Index<usize> for Vector {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.elems[index]
    }
}

impl IndexMut<usize> for Vector {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.elems[index]
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.elems == other.elems
    }
}

impl<const N: usize> PartialEq<[f64; N]> for Vector {
    fn eq(&self, other: &[f64; N]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[f64]> for Vector {
    fn eq(&self, other: &&[f64]) -> bool {
        self.as_slice() == *other
    }
}

impl AbsDiffEq for Vector {
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

impl RelativeEq for Vector {
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
