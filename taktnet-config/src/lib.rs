//! # taktnet scenario configuration
//!
//! YAML scenario files describing a timed net and how to run it: places with
//! initial tokens, transitions with firing windows and weighted arcs, and a
//! run section (seed, step limit). Loading goes through figment with an
//! environment-variable overlay; validation rejects malformed windows and
//! dangling arc references before any net is built.
//!
//! Firing windows persist `min_time` always and `max_time` only when
//! bounded; on load `min_time` defaults to 0 and `max_time` to unbounded.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

mod error;

pub use error::ConfigError;

/// Top-level scenario: one timed net plus run parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validate_scenario))]
pub struct ScenarioConfig {
    /// Scenario name used in logs.
    #[serde(default)]
    pub name: String,

    /// Places with their initial token counts.
    #[validate(length(min = 1, message = "a scenario needs at least one place"), nested)]
    pub places: Vec<PlaceConfig>,

    /// Transitions with firing windows and arcs.
    #[serde(default)]
    #[validate(nested)]
    pub transitions: Vec<TransitionConfig>,

    /// Run parameters (seed, step limit).
    #[serde(default)]
    #[validate(nested)]
    pub run: RunConfig,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PlaceConfig {
    #[validate(length(min = 1))]
    pub name: String,
    /// Initial token count.
    #[serde(default)]
    pub tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validate_window))]
pub struct TransitionConfig {
    #[validate(length(min = 1))]
    pub name: String,

    /// Earliest firing point, measured from the moment the transition
    /// becomes enabled.
    #[serde(default)]
    pub min_time: f64,

    /// Latest firing point; absent means the window never closes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,

    /// Input arcs (place -> transition).
    #[serde(default)]
    #[validate(nested)]
    pub inputs: Vec<ArcConfig>,

    /// Output arcs (transition -> place).
    #[serde(default)]
    #[validate(nested)]
    pub outputs: Vec<ArcConfig>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ArcConfig {
    #[validate(length(min = 1))]
    pub place: String,
    #[serde(default = "default_weight")]
    #[validate(range(min = 1))]
    pub weight: u32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RunConfig {
    /// Seed for the deterministic firing choice.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Upper bound on simulation steps (fires + advances).
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_weight() -> u32 {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_max_steps() -> usize {
    10_000
}

impl ScenarioConfig {
    /// Load and validate a scenario from a YAML file, with `TAKTNET_*`
    /// environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TAKTNET_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Serialize back to YAML (bounded windows keep `max_time`, unbounded
    /// ones omit it).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn validate_window(transition: &TransitionConfig) -> Result<(), ValidationError> {
    if transition.min_time < 0.0 {
        let mut error = ValidationError::new("negative_min_time");
        error.message = Some(format!("'{}': min_time must be >= 0", transition.name).into());
        return Err(error);
    }
    if let Some(max_time) = transition.max_time {
        if max_time < transition.min_time {
            let mut error = ValidationError::new("window_order");
            error.message = Some(
                format!(
                    "'{}': max_time {} is below min_time {}",
                    transition.name, max_time, transition.min_time
                )
                .into(),
            );
            return Err(error);
        }
    }
    Ok(())
}

fn validate_scenario(config: &ScenarioConfig) -> Result<(), ValidationError> {
    let mut places = HashSet::new();
    for place in &config.places {
        if !places.insert(place.name.as_str()) {
            let mut error = ValidationError::new("duplicate_place");
            error.message = Some(format!("duplicate place '{}'", place.name).into());
            return Err(error);
        }
    }

    let mut transitions = HashSet::new();
    for transition in &config.transitions {
        if !transitions.insert(transition.name.as_str()) {
            let mut error = ValidationError::new("duplicate_transition");
            error.message = Some(format!("duplicate transition '{}'", transition.name).into());
            return Err(error);
        }
        for arc in transition.inputs.iter().chain(&transition.outputs) {
            if !places.contains(arc.place.as_str()) {
                let mut error = ValidationError::new("unknown_place");
                error.message = Some(
                    format!(
                        "transition '{}' references unknown place '{}'",
                        transition.name, arc.place
                    )
                    .into(),
                );
                return Err(error);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<ScenarioConfig, ConfigError> {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: ScenarioConfig| {
                config.validate()?;
                Ok(config)
            })
    }

    const HANDSHAKE: &str = r#"
name: handshake
places:
  - name: idle
    tokens: 1
  - name: waiting
transitions:
  - name: send
    min_time: 1.0
    max_time: 2.0
    inputs:
      - place: idle
    outputs:
      - place: waiting
run:
  seed: 7
"#;

    #[test]
    fn parses_with_defaults() {
        let config = parse(HANDSHAKE).unwrap();
        assert_eq!(config.places[1].tokens, 0);
        assert_eq!(config.transitions[0].inputs[0].weight, 1);
        assert_eq!(config.transitions[0].max_time, Some(2.0));
        assert_eq!(config.run.seed, 7);
        assert_eq!(config.run.max_steps, default_max_steps());
    }

    #[test]
    fn unbounded_window_omits_max_time() {
        let mut config = parse(HANDSHAKE).unwrap();
        config.transitions[0].max_time = None;
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("min_time"));
        assert!(!yaml.contains("max_time"));
    }

    #[test]
    fn rejects_inverted_window() {
        let yaml = r#"
places:
  - name: p
transitions:
  - name: t
    min_time: 3.0
    max_time: 1.0
"#;
        assert!(matches!(
            parse(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_dangling_arc() {
        let yaml = r#"
places:
  - name: p
transitions:
  - name: t
    inputs:
      - place: nowhere
"#;
        assert!(matches!(
            parse(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_empty_scenario() {
        assert!(matches!(
            parse("places: []"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            ScenarioConfig::load_from_path("does/not/exist.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
