use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{
    DEFAULT_EFFICACY_THRESHOLD, DEFAULT_HOMOLOGY_THRESHOLD, DEFAULT_MEMORY_CEILING,
    MAX_EFFICACY_THRESHOLD, MIN_EFFICACY_THRESHOLD,
};
use crate::types::RnaguardError;

/// Target pest order used by the species-specific efficacy adjustment.
///
/// Lepidoptera and Coleoptera share a preference for GC enrichment in the
/// central guide region; `Generic` disables the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Species {
    /// Moths and butterflies
    Lepidoptera,
    /// Beetles
    Coleoptera,
    /// No species-specific adjustment
    Generic,
}

impl Species {
    /// Whether the central-GC efficacy adjustment applies.
    #[must_use]
    pub const fn uses_central_gc_rule(self) -> bool {
        matches!(self, Self::Lepidoptera | Self::Coleoptera)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lepidoptera => write!(f, "Lepidoptera"),
            Self::Coleoptera => write!(f, "Coleoptera"),
            Self::Generic => write!(f, "Generic"),
        }
    }
}

impl FromStr for Species {
    type Err = RnaguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lepidoptera" => Ok(Self::Lepidoptera),
            "coleoptera" => Ok(Self::Coleoptera),
            "generic" => Ok(Self::Generic),
            other => Err(RnaguardError::InvalidConfig(format!(
                "Unknown species '{other}' (expected lepidoptera, coleoptera, or generic)"
            ))),
        }
    }
}

/// How much non-target text the probabilistic index retains for exact
/// verification of Bloom positives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationRetention {
    /// Keep a full copy of the non-target sequence (preferred)
    Full,
    /// Keep evenly spaced representative slices only
    Samples,
}

impl fmt::Display for VerificationRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Samples => write!(f, "samples"),
        }
    }
}

impl FromStr for VerificationRetention {
    type Err = RnaguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "samples" => Ok(Self::Samples),
            other => Err(RnaguardError::InvalidConfig(format!(
                "Unknown retention policy '{other}' (expected full or samples)"
            ))),
        }
    }
}

/// Configuration for one design run.
///
/// # Examples
///
/// ```rust
/// use rnaguard_core::config::{RnaguardConfig, Species};
///
/// let config = RnaguardConfig {
///     efficacy_threshold: 80.0,
///     species: Species::Coleoptera,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RnaguardConfig {
    /// Minimum efficacy score a candidate must reach to be emitted.
    ///
    /// Accepted range is 50.0 to 99.0.
    ///
    /// **Default**: `70.0`
    pub efficacy_threshold: f64,

    /// Target pest order for the species-specific efficacy adjustment.
    ///
    /// **Default**: [`Species::Lepidoptera`]
    pub species: Species,

    /// Informational homology threshold echoed into reports.
    ///
    /// The core exclusion length is fixed at 15 regardless of this value.
    ///
    /// **Default**: `15`
    pub homology_threshold: usize,

    /// Informational RNAi delivery mode label carried through to reports.
    ///
    /// **Default**: `"siRNA"`
    pub rnai_mode: String,

    /// Informational delivery-system label carried through to reports.
    ///
    /// **Default**: `"spray"`
    pub delivery_system: String,

    /// Verification-text retention policy for the probabilistic index.
    ///
    /// **Default**: [`VerificationRetention::Full`]
    pub retention: VerificationRetention,

    /// Total memory ceiling for index construction, in bytes.
    ///
    /// Construction is refused when the pre-allocation estimate exceeds it.
    ///
    /// **Default**: 1 GiB
    pub memory_ceiling: usize,
}

impl Default for RnaguardConfig {
    fn default() -> Self {
        Self {
            efficacy_threshold: DEFAULT_EFFICACY_THRESHOLD,
            species: Species::Lepidoptera,
            homology_threshold: DEFAULT_HOMOLOGY_THRESHOLD,
            rnai_mode: "siRNA".to_string(),
            delivery_system: "spray".to_string(),
            retention: VerificationRetention::Full,
            memory_ceiling: DEFAULT_MEMORY_CEILING,
        }
    }
}

impl RnaguardConfig {
    /// Checks that every configured value lies in its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`RnaguardError::InvalidConfig`] when the efficacy threshold
    /// is outside [50, 99] or the memory ceiling is zero.
    pub fn validate(&self) -> Result<(), RnaguardError> {
        if !(MIN_EFFICACY_THRESHOLD..=MAX_EFFICACY_THRESHOLD).contains(&self.efficacy_threshold) {
            return Err(RnaguardError::InvalidConfig(format!(
                "efficacy_threshold {} outside [{}, {}]",
                self.efficacy_threshold, MIN_EFFICACY_THRESHOLD, MAX_EFFICACY_THRESHOLD
            )));
        }
        if self.memory_ceiling == 0 {
            return Err(RnaguardError::InvalidConfig(
                "memory_ceiling must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
