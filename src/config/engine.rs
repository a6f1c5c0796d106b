use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables for discovery and fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Candidates verified by `find_element` before giving up.
    pub max_attempts: usize,

    /// Candidates must score strictly above this to be ranked.
    pub min_confidence: f64,

    /// Matches relevance-checked per form selector.
    pub form_scan_limit: usize,

    /// Header-field detection.
    pub positional: PositionalConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_confidence: 0.3,
            form_scan_limit: 5,
            positional: PositionalConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "engine.min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        self.positional.validate()
    }
}

/// Geometry thresholds for the positional generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PositionalConfig {
    /// Inputs/buttons measured, in document order.
    pub scan_limit: usize,

    /// Fraction of the viewport height that counts as the header band.
    pub header_fraction: f64,

    /// Minimum width in CSS pixels (exclusive).
    pub min_width: f64,
}

impl Default for PositionalConfig {
    fn default() -> Self {
        Self {
            scan_limit: 20,
            header_fraction: 0.25,
            min_width: 200.0,
        }
    }
}

impl PositionalConfig {
    fn validate(&self) -> Result<()> {
        if !(self.header_fraction > 0.0 && self.header_fraction <= 1.0) {
            return Err(Error::Config(format!(
                "engine.positional.header_fraction must be within (0, 1], got {}",
                self.header_fraction
            )));
        }
        if !(self.min_width >= 0.0) {
            return Err(Error::Config(format!(
                "engine.positional.min_width must be non-negative, got {}",
                self.min_width
            )));
        }
        Ok(())
    }
}
