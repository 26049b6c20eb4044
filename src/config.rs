//! Grading configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::GradingError;
use crate::model::Pairing;
use crate::normalizer::StrategyType;
use crate::scoring::ScoringPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default grading scale (grades out of 20)
pub const DEFAULT_SCALE: f64 = 20.0;

/// Grading parameters for one exam or batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Final grade scale: `total_awarded * scale / total_possible`
    pub scale: f64,
    /// Concept extraction for dual-dimension rows
    pub strategy: StrategyType,
    /// Scoring of free-text questions: `strict` or `additive`
    pub free_text_policy: ScoringPolicy,
    /// Student-to-key row pairing in dual-dimension exams
    pub pairing: Pairing,
    /// De-duplicate classification key blocks and drop 1-character blocks
    pub dedupe_classification_key: bool,
    /// JSON lexicon replacing the built-in Spanish tables
    pub lexicon_path: Option<PathBuf>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            strategy: StrategyType::default(),
            free_text_policy: ScoringPolicy::Additive,
            pairing: Pairing::default(),
            dedupe_classification_key: false,
            lexicon_path: None,
        }
    }
}

impl GradingConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read grading config: {:?}", path))?;

        let config: GradingConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse grading config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), GradingError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GradingError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }

        if self.free_text_policy == ScoringPolicy::DualDimension {
            return Err(GradingError::InvalidConfig(
                "free_text_policy must be 'strict' or 'additive'".to_string(),
            ));
        }

        Ok(())
    }
}
