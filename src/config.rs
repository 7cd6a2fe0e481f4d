//! Simulation configuration.
//!
//! Every tunable lives here so a run can be described by a single JSON file.
//! Missing fields fall back to the defaults, which reproduce the classic
//! behavior (10k particles, 1.2 interaction radius, pinch at 0.05).

use crate::error::ConfigError;
use crate::formation::FormationRates;
use crate::hands::{Normalizer, RoleTable};
use crate::simulation::SelectionPolicy;
use crate::updater::{ForceParams, ParticleUpdater};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete simulation configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub particle_count: usize,
    /// Seed for the random formations. `None` scatters differently every run.
    pub seed: Option<u64>,
    /// Fraction of the gap to the blended target closed per frame.
    pub easing: f32,
    pub formation: FormationRates,
    pub forces: ForceParams,
    /// Push/pull role of each fingertip, thumb first.
    pub roles: RoleTable,
    /// World units spanned by the detector's full image width.
    pub world_scale: f32,
    /// Thumb-index distance (normalized image units) that counts as a pinch.
    pub pinch_threshold: f32,
    /// How hotkey and gesture shape selection interact.
    pub selection_policy: SelectionPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            seed: None,
            easing: 0.1,
            formation: FormationRates::default(),
            forces: ForceParams::default(),
            roles: RoleTable::default(),
            world_scale: 10.0,
            pinch_threshold: 0.05,
            selection_policy: SelectionPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the per-frame math cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(invalid("particle_count must be greater than zero"));
        }

        unit_rate("easing", self.easing)?;
        unit_rate("formation.attack", self.formation.attack)?;
        unit_rate("formation.release", self.formation.release)?;

        positive("forces.interaction_radius", self.forces.interaction_radius)?;
        positive("world_scale", self.world_scale)?;
        positive("pinch_threshold", self.pinch_threshold)?;

        if !self.forces.push_strength.is_finite() || !self.forces.pull_strength.is_finite() {
            return Err(invalid("force strengths must be finite"));
        }
        Ok(())
    }

    /// Updater configured from these settings.
    pub fn updater(&self) -> ParticleUpdater {
        ParticleUpdater::new(self.easing, self.forces)
    }

    /// Input normalizer configured from these settings.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer {
            world_scale: self.world_scale,
            pinch_threshold: self.pinch_threshold,
            roles: self.roles,
        }
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn unit_rate(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be in (0, 1], got {}", name, value)))
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive and finite, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::ForceRole;

    #[test]
    fn test_default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "particle_count": 250,
            "seed": 42,
            "forces": { "interaction_radius": 2.0 },
            "roles": ["Push", "Push", "Pull", "Pull", "Push"],
            "selection_policy": "GestureRisingEdge"
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.particle_count, 250);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.forces.interaction_radius, 2.0);
        assert_eq!(config.forces.push_strength, 0.15);
        assert_eq!(config.roles.role(2), ForceRole::Pull);
        assert_eq!(config.selection_policy, SelectionPolicy::GestureRisingEdge);
    }

    #[test]
    fn test_rejects_zero_particles() {
        let err = SimConfig::from_json(r#"{"particle_count": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let mut config = SimConfig::default();
        config.easing = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.formation.release = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.formation.attack = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let mut config = SimConfig::default();
        config.forces.interaction_radius = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.forces.pull_strength = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SimConfig::from_json("{ particle_count: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("morphcloud_config_{}.json", std::process::id()));
        let config = SimConfig {
            particle_count: 64,
            seed: Some(9),
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load("/nonexistent/morphcloud.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
