//! Ordered fallback tiers that always yield a tensor
//!
//! The chain evaluates its strategies left to right. The first strategy that
//! returns a tensor wins; every failure is recorded and the next tier is
//! tried. When all strategies fail the constant tensor is returned, so
//! [`FallbackChain::run`] has no error path.

use crate::extract::extract_bytes;
use crate::normalize::normalize;
use crate::simulate::simulate_payload;
use crate::stats::ImageStatistics;
use crate::synth::synthesize_from_statistics;
use photo_tensor_common::{NormalizedTensor, PreprocessError, Result};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Strategy tier, in decreasing fidelity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Synthesis from decoded payload bytes
    Primary,
    /// Pattern seeded from the payload text
    Simulated,
    /// Fixed `-0.5` tensor
    ConstantFallback,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Simulated => write!(f, "simulated"),
            Tier::ConstantFallback => write!(f, "constant_fallback"),
        }
    }
}

/// One way of turning a payload into a tensor
pub trait TensorStrategy: Send + Sync {
    /// Tier this strategy runs as
    fn tier(&self) -> Tier;

    /// Produce a tensor or a typed failure
    fn produce(&self, payload: &str) -> Result<NormalizedTensor>;
}

/// Byte-derived synthesis: decode, analyze, synthesize, normalize
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryStrategy;

impl TensorStrategy for PrimaryStrategy {
    fn tier(&self) -> Tier {
        Tier::Primary
    }

    fn produce(&self, payload: &str) -> Result<NormalizedTensor> {
        let bytes = extract_bytes(payload)?;
        let stats = ImageStatistics::analyze(bytes.as_slice());
        debug!(
            "Payload stats: bytes={}, avg_brightness={}, contrast={:.3}, entropy={:.3}, palette={}",
            bytes.len(),
            stats.bytes.avg_brightness,
            stats.bytes.contrast_factor,
            stats.entropy.value(),
            stats.palette.len()
        );
        let grid = synthesize_from_statistics(bytes.as_slice(), &stats)?;
        normalize(&grid)
    }
}

/// Hash-seeded pattern generation from the payload text alone
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedStrategy;

impl TensorStrategy for SimulatedStrategy {
    fn tier(&self) -> Tier {
        Tier::Simulated
    }

    fn produce(&self, payload: &str) -> Result<NormalizedTensor> {
        normalize(&simulate_payload(payload))
    }
}

/// A tier that failed, with the reason
#[derive(Debug)]
pub struct TierFailure {
    pub tier: Tier,
    pub error: PreprocessError,
}

/// Result of running the chain
#[derive(Debug)]
pub struct PreprocessOutcome {
    pub tensor: NormalizedTensor,
    /// Tier that produced `tensor`
    pub tier: Tier,
    /// Failures of earlier tiers, in evaluation order
    pub failures: Vec<TierFailure>,
}

impl PreprocessOutcome {
    /// True when a lower-fidelity tier had to be used
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.tier != Tier::Primary
    }
}

/// Ordered tier list ending in the infallible constant tensor
pub struct FallbackChain {
    tiers: Vec<Box<dyn TensorStrategy>>,
}

impl FallbackChain {
    /// Primary, then simulated, then constant
    #[must_use]
    pub fn standard() -> Self {
        Self::with_tiers(vec![Box::new(PrimaryStrategy), Box::new(SimulatedStrategy)])
    }

    /// Custom tier order; the constant tier is always appended implicitly
    #[must_use]
    pub fn with_tiers(tiers: Vec<Box<dyn TensorStrategy>>) -> Self {
        Self { tiers }
    }

    /// Tiers in evaluation order, including the terminal constant tier
    #[must_use]
    pub fn tiers(&self) -> Vec<Tier> {
        self.tiers
            .iter()
            .map(|s| s.tier())
            .chain(std::iter::once(Tier::ConstantFallback))
            .collect()
    }

    /// Run every tier at most once, left to right, until one succeeds
    #[must_use]
    pub fn run(&self, payload: &str) -> PreprocessOutcome {
        let mut failures = Vec::new();

        let produced = self.tiers.iter().find_map(|strategy| {
            match run_guarded(strategy.as_ref(), payload) {
                Ok(tensor) => Some((strategy.tier(), tensor)),
                Err(error) => {
                    warn!("{} tier failed, degrading: {}", strategy.tier(), error);
                    failures.push(TierFailure {
                        tier: strategy.tier(),
                        error,
                    });
                    None
                }
            }
        });

        let (tier, tensor) =
            produced.unwrap_or_else(|| (Tier::ConstantFallback, NormalizedTensor::constant()));

        if tier != Tier::Primary {
            debug!("Preprocessing served by {} tier", tier);
        }

        PreprocessOutcome {
            tensor,
            tier,
            failures,
        }
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("tiers", &self.tiers())
            .finish()
    }
}

/// Run one strategy, turning a panic into a tier failure
pub(crate) fn run_guarded(
    strategy: &dyn TensorStrategy,
    payload: &str,
) -> Result<NormalizedTensor> {
    catch_unwind(AssertUnwindSafe(|| strategy.produce(payload))).unwrap_or_else(|panic| {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(PreprocessError::SynthesisError(format!(
            "{} tier panicked: {reason}",
            strategy.tier()
        )))
    })
}
