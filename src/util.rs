use rand::{CryptoRng, RngCore};

// adapted from an unpublished version of `rng_core`
/// Cryptographically secure random number generator usable as a trait object.
///
/// This trait is implemented for every type that implements [`CryptoRng`] and [`RngCore`], such
/// as [`rand::rngs::OsRng`].
pub trait CryptoRngCore: CryptoRng + RngCore {
    /// Upcast to a plain [`RngCore`].
    fn as_rngcore(&mut self) -> &mut dyn RngCore;
}

impl<T: CryptoRng + RngCore> CryptoRngCore for T {
    fn as_rngcore(&mut self) -> &mut dyn RngCore {
        self
    }
}
