use num_bigint_dig::{BigUint, RandBigInt as _};
use once_cell::sync::{Lazy, OnceCell};
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroize as _;
use crate::error::{Error, Result};
use crate::util::CryptoRngCore;
use super::dh::DhGroup;

/// Implementation of the Diffie-Hellman primitive over prime fields.
///
/// The default implementation is [`NumBigintDh`]. Other implementations (for example, ones that
/// delegate to a hardware module) can be plugged in with
/// [`KexConfig::dh_provider`][super::KexConfig::dh_provider].
pub trait DhProvider: Send + Sync {
    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Range of prime sizes (in bits) that this provider supports, if it is known statically.
    ///
    /// If this returns `None`, the range is found by [`GexCapability::probe()`].
    fn static_range(&self) -> Option<(u32, u32)> {
        None
    }

    /// Generates a private exponent `x` and the public value `g^x mod p`.
    ///
    /// The public value must lie strictly between 1 and `p - 1`.
    fn generate_keypair(&self, group: &DhGroup, rng: &mut dyn CryptoRngCore) -> Result<DhKeypair>;

    /// Computes `peer_public^x mod p`, where `x` is the private exponent of `keypair`.
    fn agree(&self, group: &DhGroup, keypair: &DhKeypair, peer_public: &BigUint) -> Result<BigUint>;
}

/// Private exponent and public value of one side of Diffie-Hellman.
///
/// The private exponent is zeroized on drop.
pub struct DhKeypair {
    private: BigUint,
    public: BigUint,
}

impl DhKeypair {
    /// Creates a key pair from the private exponent `x` and the public value `g^x mod p`.
    pub fn new(private: BigUint, public: BigUint) -> DhKeypair {
        DhKeypair { private, public }
    }

    /// The private exponent `x`.
    pub fn private(&self) -> &BigUint {
        &self.private
    }

    /// The public value `g^x mod p`.
    pub fn public(&self) -> &BigUint {
        &self.public
    }
}

impl Drop for DhKeypair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

impl fmt::Debug for DhKeypair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DhKeypair").field("public", &self.public).finish_non_exhaustive()
    }
}

/// Default [`DhProvider`] based on the `num-bigint-dig` crate.
///
/// It supports primes from 1024 to 8192 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumBigintDh;

impl DhProvider for NumBigintDh {
    fn name(&self) -> &'static str {
        "num-bigint-dig"
    }

    fn static_range(&self) -> Option<(u32, u32)> {
        Some((1024, 8192))
    }

    fn generate_keypair(&self, group: &DhGroup, rng: &mut dyn CryptoRngCore) -> Result<DhKeypair> {
        random_keypair(group, rng, |base, exp, modulus| base.modpow(exp, modulus))
    }

    fn agree(&self, group: &DhGroup, keypair: &DhKeypair, peer_public: &BigUint) -> Result<BigUint> {
        Ok(peer_public.modpow(keypair.private(), group.p()))
    }
}

/// Draws `x` from `[2, p - 1)` until `g^x mod p` lies in `(1, p - 1)`.
pub(crate) fn random_keypair(
    group: &DhGroup,
    rng: &mut dyn CryptoRngCore,
    modpow: impl Fn(&BigUint, &BigUint, &BigUint) -> BigUint,
) -> Result<DhKeypair> {
    let two = BigUint::from(2u32);
    if *group.p_minus_1() <= two {
        return Err(Error::Protocol("Diffie-Hellman prime is too small"))
    }

    for _ in 0..16 {
        let private = rng.as_rngcore().gen_biguint_range(&two, group.p_minus_1());
        let public = modpow(group.g(), &private, group.p());
        let keypair = DhKeypair::new(private, public);
        if group.is_in_range(keypair.public()) {
            return Ok(keypair)
        }
        log::trace!("generated Diffie-Hellman public value is out of range, retrying");
    }
    Err(Error::Random("could not generate Diffie-Hellman key pair"))
}

/// Computes `base^exponent mod modulus` with left-to-right square-and-multiply.
///
/// This does not depend on any [`DhProvider`], so it works for primes of any size, including
/// sizes that are not a multiple of 64 bits.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn modpow_manual(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    let base = base % modulus;
    let mut result = BigUint::from(1u32) % modulus;
    for byte in exponent.to_bytes_be() {
        for i in (0..8).rev() {
            result = &result * &result % modulus;
            if (byte >> i) & 1 != 0 {
                result = &result * &base % modulus;
            }
        }
    }
    result
}

/// Sizes of the safe primes that are tried by [`GexCapability::probe()`], largest first.
const PROBE_GROUPS: &[(u32, fn() -> DhGroup)] = &[
    (8192, DhGroup::group_18),
    (6144, DhGroup::group_17),
    (4096, DhGroup::group_16),
    (3072, DhGroup::group_15),
    (2048, DhGroup::group_14),
    (1024, DhGroup::group_2),
];

/// Result of probing one provider, shared by all configurations that use the provider.
pub(crate) type CapabilityCell = Arc<OnceCell<Option<GexCapability>>>;

static GLOBAL_CAPABILITY: Lazy<CapabilityCell> = Lazy::new(Default::default);

/// Range of prime sizes supported for Diffie-Hellman group exchange.
///
/// The maximum is used to clamp the bounds in SSH_MSG_KEX_DH_GEX_REQUEST and to reject primes
/// that are too large.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GexCapability {
    min_bits: u32,
    max_bits: u32,
}

impl GexCapability {
    /// Creates the capability from an explicit range.
    pub fn from_range(min_bits: u32, max_bits: u32) -> Result<GexCapability> {
        if min_bits == 0 || min_bits > max_bits {
            return Err(Error::Config("invalid range of Diffie-Hellman prime sizes"))
        }
        Ok(GexCapability { min_bits, max_bits })
    }

    /// Smallest supported prime size in bits.
    pub fn min_bits(&self) -> u32 {
        self.min_bits
    }

    /// Largest supported prime size in bits.
    pub fn max_bits(&self) -> u32 {
        self.max_bits
    }

    /// Finds out which prime sizes `provider` supports.
    ///
    /// If the provider declares a [static range][DhProvider::static_range], it is used directly.
    /// Otherwise, we generate a key pair and compute a shared secret for every known safe prime
    /// and return the range between the smallest and largest successful sizes.
    pub fn probe(provider: &dyn DhProvider) -> Result<GexCapability> {
        if let Some((min_bits, max_bits)) = provider.static_range() {
            log::debug!("{} supports Diffie-Hellman primes from {} to {} bits",
                provider.name(), min_bits, max_bits);
            return Self::from_range(min_bits, max_bits)
        }

        let mut rng = rand::rngs::OsRng;
        let mut supported = Vec::new();
        for &(bits, make_group) in PROBE_GROUPS.iter() {
            let group = make_group();
            let res = provider.generate_keypair(&group, &mut rng)
                .and_then(|keypair| provider.agree(&group, &keypair, keypair.public()));
            match res {
                Ok(_) => {
                    log::trace!("{} supports {}-bit Diffie-Hellman", provider.name(), bits);
                    supported.push(bits);
                },
                Err(err) => log::trace!("{} does not support {}-bit Diffie-Hellman: {}",
                    provider.name(), bits, err),
            }
        }

        match (supported.iter().min(), supported.iter().max()) {
            (Some(&min_bits), Some(&max_bits)) => {
                log::debug!("{} supports Diffie-Hellman primes from {} to {} bits",
                    provider.name(), min_bits, max_bits);
                Self::from_range(min_bits, max_bits)
            },
            _ => Err(Error::Config("Diffie-Hellman provider does not support any prime size")),
        }
    }

    /// The capability of [`NumBigintDh`], computed at most once per process.
    ///
    /// If the probe fails, the failure is also remembered and every call returns an error.
    pub fn global() -> Result<GexCapability> {
        Self::probe_cached(&GLOBAL_CAPABILITY, &NumBigintDh)
    }

    /// Probes `provider` unless `cell` already holds the result of an earlier probe.
    pub(crate) fn probe_cached(
        cell: &OnceCell<Option<GexCapability>>,
        provider: &dyn DhProvider,
    ) -> Result<GexCapability> {
        let capability = cell.get_or_init(|| match Self::probe(provider) {
            Ok(capability) => Some(capability),
            Err(err) => {
                log::warn!("could not find Diffie-Hellman prime sizes supported by {}: {}",
                    provider.name(), err);
                None
            },
        });
        capability.ok_or(Error::Config("Diffie-Hellman group exchange is not supported"))
    }

    pub(crate) fn global_cell() -> CapabilityCell {
        GLOBAL_CAPABILITY.clone()
    }

    /// Returns true if primes with `bits` bits are in the supported range.
    pub fn supports(&self, bits: u32) -> bool {
        self.min_bits <= bits && bits <= self.max_bits
    }
}
