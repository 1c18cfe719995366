use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::geom::LabelPlacement;
use crate::graph::{AdjacencyOptions, DEFAULT_PALETTE};
use crate::temporal::OverlapPolicy;

/// Settings shared by every pipeline stage. Built once, never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of color classes.
    pub palette_size: u8,
    /// Decimal places coordinates are snapped to before adjacency tests.
    pub snap_decimals: Option<u32>,
    pub overlap_policy: OverlapPolicy,
    pub label_placement: LabelPlacement,
    /// Round output coordinates to this many decimal places.
    pub output_decimals: Option<u32>,
    /// Copy raw source attributes into the output properties.
    pub keep_source_properties: bool,
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE,
            snap_decimals: Some(7),
            overlap_policy: OverlapPolicy::default(),
            label_placement: LabelPlacement::default(),
            output_decimals: None,
            keep_source_properties: false,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.palette_size > 0, "palette_size must be at least 1");
        for (name, decimals) in [("snap_decimals", self.snap_decimals), ("output_decimals", self.output_decimals)] {
            ensure!(decimals.is_none_or(|d| d <= 15), "{name} must be at most 15");
        }
        Ok(())
    }

    pub fn adjacency(&self) -> AdjacencyOptions {
        AdjacencyOptions { snap_decimals: self.snap_decimals, parallel: self.parallel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(PipelineConfig::from_json_str("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = PipelineConfig::from_json_str(r#"{
            "palette_size": 6,
            "snap_decimals": null,
            "overlap_policy": "narrowest",
            "label_placement": "interior_fallback",
            "output_decimals": 5,
            "parallel": false
        }"#).unwrap();

        assert_eq!(config.palette_size, 6);
        assert_eq!(config.snap_decimals, None);
        assert_eq!(config.overlap_policy, OverlapPolicy::Narrowest);
        assert_eq!(config.label_placement, LabelPlacement::InteriorFallback);
        assert_eq!(config.output_decimals, Some(5));
        assert!(!config.parallel);
        assert!(!config.keep_source_properties);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(PipelineConfig::from_json_str(r#"{"palette_size": 0}"#).is_err());
        assert!(PipelineConfig::from_json_str(r#"{"snap_decimals": 40}"#).is_err());
        assert!(PipelineConfig::from_json_str(r#"{"pallete_size": 5}"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"keep_source_properties": true}"#).unwrap();
        assert!(PipelineConfig::read_json(&path).unwrap().keep_source_properties);
    }
}
