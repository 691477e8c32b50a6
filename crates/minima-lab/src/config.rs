//! Lab configuration.
//!
//! A lab configuration is a TOML document with an optional
//! `[classification]` table and any number of `[[plan]]` tables:
//!
//! ```toml
//! [classification]
//! target = 0.18
//! tolerance = 0.001
//!
//! [[plan]]
//! name = "small-steps"
//! method = "gradient_descent"
//! max_iterations = 500
//!
//! [plan.sweep]
//! kind = "hyperparameter"
//! start = { x = 1.0, y = 1.0 }
//! values = [0.01, 0.02]
//! ```

use std::collections::HashSet;
use std::path::Path;

use minima_math::classification::ClassificationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};
use crate::plan::ExperimentPlan;

/// Lab configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    /// Thresholds for labelling results.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Plans to run. Empty means the built-in plans.
    #[serde(default, rename = "plan")]
    pub plans: Vec<ExperimentPlan>,
}

impl LabConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> LabResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> LabResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration holding the built-in plans explicitly.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            classification: ClassificationConfig::default(),
            plans: ExperimentPlan::builtin(),
        }
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> LabResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configured plans, or the built-ins when none are configured.
    #[must_use]
    pub fn plans(&self) -> Vec<ExperimentPlan> {
        if self.plans.is_empty() {
            ExperimentPlan::builtin()
        } else {
            self.plans.clone()
        }
    }

    /// Validates every plan and rejects duplicate names.
    pub fn validate(&self) -> LabResult<()> {
        let mut seen = HashSet::new();
        for plan in &self.plans {
            plan.validate()?;
            if !seen.insert(plan.name.as_str()) {
                return Err(LabError::invalid_plan(&plan.name, "duplicate plan name"));
            }
        }

        let c = &self.classification;
        if !(c.tolerance > 0.0 && c.success_tolerance > 0.0 && c.target.is_finite()) {
            return Err(LabError::InvalidConfig(
                "classification target must be finite and tolerances positive".to_string(),
            ));
        }
        Ok(())
    }
}
