/// Element types that [`Vector::flatten`][crate::Vector::flatten] can produce
/// buffers of.
///
/// The library computes in `f64` throughout; graphics APIs usually want `f32`
/// uniform and attribute buffers, so the conversion happens once at the
/// flattening boundary.
pub trait Scalar: Copy + Default {
    /// Converts from the `f64` the library computes in, possibly losing
    /// precision.
    fn from_f64(value: f64) -> Self;
}

impl Scalar for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
