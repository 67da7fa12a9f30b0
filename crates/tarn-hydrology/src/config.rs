//! Pass configuration and validation.
//!
//! [`HydrologyConfig`] carries the tuning constants shared by the drainage
//! and flood wave passes. [`validate()`](HydrologyConfig::validate) is
//! called by every pass constructor.

use std::error::Error;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`HydrologyConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `hard_minima_epsilon` is NaN or outside the open interval `(0, 1)`.
    InvalidHardMinimaEpsilon {
        /// The invalid value.
        value: f32,
    },
    /// `force_carve_factor` is NaN or outside the open interval `(0, 1)`.
    InvalidForceCarveFactor {
        /// The invalid value.
        value: f32,
    },
    /// `lake_coverage_fraction` is NaN or outside `[0, 1]`.
    InvalidLakeCoverage {
        /// The invalid value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHardMinimaEpsilon { value } => {
                write!(f, "hard_minima_epsilon must be within (0, 1), got {value}")
            }
            Self::InvalidForceCarveFactor { value } => {
                write!(f, "force_carve_factor must be within (0, 1), got {value}")
            }
            Self::InvalidLakeCoverage { value } => {
                write!(f, "lake_coverage_fraction must be within [0, 1], got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── HydrologyConfig ────────────────────────────────────────────────

/// Tuning constants for the hydrology passes.
///
/// The two 0.9 factors are separate: one is a safety margin
/// below the lowest positive neighbour, the other is the fraction of the
/// minimum's elevation a forced channel ends at.
#[derive(Clone, Debug, PartialEq)]
pub struct HydrologyConfig {
    /// Multiplier applied to the lowest positive neighbour when raising a
    /// zero-elevation cluster leaf. Default: 0.9.
    pub hard_minima_epsilon: f32,
    /// Fraction of the minimum's elevation used as the target of a forced
    /// carve. Default: 0.9.
    pub force_carve_factor: f32,
    /// Share of land corners turned into lake sections at a flood
    /// threshold of 1. Default: 0.2.
    pub lake_coverage_fraction: f32,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            hard_minima_epsilon: 0.9,
            force_carve_factor: 0.9,
            lake_coverage_fraction: 0.2,
        }
    }
}

impl HydrologyConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !open_unit(self.hard_minima_epsilon) {
            return Err(ConfigError::InvalidHardMinimaEpsilon {
                value: self.hard_minima_epsilon,
            });
        }
        if !open_unit(self.force_carve_factor) {
            return Err(ConfigError::InvalidForceCarveFactor {
                value: self.force_carve_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.lake_coverage_fraction) {
            return Err(ConfigError::InvalidLakeCoverage {
                value: self.lake_coverage_fraction,
            });
        }
        Ok(())
    }
}

fn open_unit(v: f32) -> bool {
    v > 0.0 && v < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = HydrologyConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.hard_minima_epsilon, 0.9);
        assert_eq!(config.force_carve_factor, 0.9);
        assert_eq!(config.lake_coverage_fraction, 0.2);
    }

    #[test]
    fn epsilon_bounds_are_open() {
        for value in [0.0, 1.0, -0.5, f32::NAN] {
            let config = HydrologyConfig {
                hard_minima_epsilon: value,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidHardMinimaEpsilon { .. })
            ));
        }
    }

    #[test]
    fn force_factor_rejects_one() {
        let config = HydrologyConfig {
            force_carve_factor: 1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidForceCarveFactor { value: 1.0 })
        );
    }

    #[test]
    fn coverage_bounds_are_closed() {
        for value in [0.0, 1.0] {
            let config = HydrologyConfig {
                lake_coverage_fraction: value,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
        let config = HydrologyConfig {
            lake_coverage_fraction: f32::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn error_display() {
        let e = ConfigError::InvalidLakeCoverage { value: 2.0 };
        assert_eq!(
            e.to_string(),
            "lake_coverage_fraction must be within [0, 1], got 2"
        );
    }
}
