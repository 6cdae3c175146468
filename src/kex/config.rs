use derivative::Derivative;
use std::sync::Arc;
use crate::error::{Error, Result};
use super::provider::{CapabilityCell, DhProvider, GexCapability, NumBigintDh};

/// Configuration of a key exchange.
///
/// The configuration is cloned into every [`KexSession`][super::KexSession], so it can be shared
/// by many connections. Use [`KexConfig::with()`] to tweak the defaults:
///
/// ```
/// # use kagi::kex::{KexConfig, GexBounds, GexSecretPath};
/// let config = KexConfig::default().with(|c| {
///     c.gex_bounds = GexBounds::new(3072, 4096, 8192).unwrap();
///     c.gex_secret_path = GexSecretPath::Manual;
/// });
/// # let _ = config;
/// ```
#[derive(Derivative, Clone)]
#[derivative(Debug)]
#[non_exhaustive]
pub struct KexConfig {
    /// Group sizes requested in Diffie-Hellman group exchange.
    ///
    /// The bounds are clamped to the maximum of the [capability][Self::gex_capability] when the
    /// request is sent.
    pub gex_bounds: GexBounds,

    /// Range of prime sizes supported for Diffie-Hellman group exchange.
    ///
    /// If this is `None`, the capability is [probed][GexCapability::probe] from the
    /// [`dh_provider`][Self::dh_provider] the first time it is needed, and the result is shared
    /// by all clones of this configuration. See [`KexConfig::effective_gex_capability()`].
    pub gex_capability: Option<GexCapability>,

    /// How to compute the Diffie-Hellman group exchange secret.
    pub gex_secret_path: GexSecretPath,

    /// Implementation of Diffie-Hellman that is used for the fixed groups and for group exchange.
    #[derivative(Debug(format_with = "fmt_provider"))]
    pub dh_provider: Arc<dyn DhProvider>,

    #[derivative(Debug = "ignore")]
    probed: ProbedCapability,
}

/// Capability probed from `provider`, computed at most once.
#[derive(Clone)]
struct ProbedCapability {
    provider: Arc<dyn DhProvider>,
    cell: CapabilityCell,
}

impl ProbedCapability {
    fn new(provider: Arc<dyn DhProvider>) -> ProbedCapability {
        ProbedCapability { provider, cell: CapabilityCell::default() }
    }
}

fn same_provider(a: &Arc<dyn DhProvider>, b: &Arc<dyn DhProvider>) -> bool {
    Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
}

fn fmt_provider(provider: &Arc<dyn DhProvider>, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str(provider.name())
}

impl KexConfig {
    /// Mutate `self` in a closure.
    pub fn with<F: FnOnce(&mut Self)>(mut self, f: F) -> Self {
        f(&mut self);
        if !same_provider(&self.dh_provider, &self.probed.provider) {
            self.probed = ProbedCapability::new(self.dh_provider.clone());
        }
        self
    }

    /// The range of prime sizes used for Diffie-Hellman group exchange.
    ///
    /// This is [`gex_capability`][Self::gex_capability] if it is set. Otherwise the
    /// [`dh_provider`][Self::dh_provider] is probed once and the result (including a failure) is
    /// remembered. Returns an error of kind
    /// [`UnsupportedConfiguration`][crate::ErrorKind::UnsupportedConfiguration] if the provider
    /// cannot be used for group exchange.
    pub fn effective_gex_capability(&self) -> Result<GexCapability> {
        if let Some(capability) = self.gex_capability {
            return Ok(capability)
        }
        if same_provider(&self.dh_provider, &self.probed.provider) {
            GexCapability::probe_cached(&self.probed.cell, &*self.dh_provider)
        } else {
            // the provider was replaced without `with()`
            GexCapability::probe(&*self.dh_provider)
        }
    }
}

impl Default for KexConfig {
    fn default() -> Self {
        let dh_provider: Arc<dyn DhProvider> = Arc::new(NumBigintDh);
        KexConfig {
            gex_bounds: GexBounds::default(),
            gex_capability: None,
            gex_secret_path: GexSecretPath::Auto,
            probed: ProbedCapability { provider: dh_provider.clone(), cell: GexCapability::global_cell() },
            dh_provider,
        }
    }
}

/// Bounds for the size of the group in Diffie-Hellman group exchange (in bits).
///
/// These are the three numbers sent in SSH_MSG_KEX_DH_GEX_REQUEST (RFC 4419).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GexBounds {
    /// Minimal acceptable size of the prime.
    pub min: u32,
    /// Preferred size of the prime.
    pub preferred: u32,
    /// Maximal acceptable size of the prime.
    pub max: u32,
}

impl GexBounds {
    /// Creates the bounds, checking that `min <= preferred <= max`.
    pub fn new(min: u32, preferred: u32, max: u32) -> Result<GexBounds> {
        if min > preferred || preferred > max {
            return Err(Error::Config("group exchange bounds must satisfy min <= preferred <= max"))
        }
        Ok(GexBounds { min, preferred, max })
    }

    /// Clamps every bound to the maximal size supported by `capability`.
    pub fn clamp(self, capability: &GexCapability) -> GexBounds {
        let max_bits = capability.max_bits();
        GexBounds {
            min: self.min.min(max_bits),
            preferred: self.preferred.min(max_bits),
            max: self.max.min(max_bits),
        }
    }
}

impl Default for GexBounds {
    fn default() -> Self {
        GexBounds { min: 2048, preferred: 4096, max: 8192 }
    }
}

/// Selection of the algorithm that computes the Diffie-Hellman group exchange secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GexSecretPath {
    /// Use the [`DhProvider`] when the size of the prime is a multiple of 64 bits, and
    /// [`modpow_manual()`][super::modpow_manual] otherwise.
    #[default]
    Auto,
    /// Always use the [`DhProvider`].
    Provider,
    /// Always use [`modpow_manual()`][super::modpow_manual].
    Manual,
}

impl GexSecretPath {
    pub(crate) fn use_provider(self, p_bits: usize) -> bool {
        match self {
            GexSecretPath::Auto => p_bits % 64 == 0,
            GexSecretPath::Provider => true,
            GexSecretPath::Manual => false,
        }
    }
}
