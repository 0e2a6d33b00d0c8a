//! Serializable outlier treatment plans.

use super::bounds::{OutlierMethod, DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE};
use super::{DEFAULT_WINSOR_LIMITS, DEFAULT_Z_THRESHOLD};
use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};

fn default_lower() -> f64 {
    DEFAULT_LOWER_PERCENTILE
}

fn default_upper() -> f64 {
    DEFAULT_UPPER_PERCENTILE
}

fn default_limits() -> (f64, f64) {
    DEFAULT_WINSOR_LIMITS
}

fn default_threshold() -> f64 {
    DEFAULT_Z_THRESHOLD
}

fn default_method() -> OutlierMethod {
    OutlierMethod::Iqr
}

/// A single treatment applied to a list of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TreatmentStep {
    /// Remove rows outside the IQR fences.
    RemoveIqr { columns: Vec<String> },
    /// Remove rows outside percentile ranks.
    RemovePercentile {
        columns: Vec<String>,
        #[serde(default = "default_lower")]
        lower_percentile: f64,
        #[serde(default = "default_upper")]
        upper_percentile: f64,
    },
    /// Clamp values to bounds.
    Clip {
        columns: Vec<String>,
        #[serde(default = "default_method")]
        method: OutlierMethod,
        #[serde(default = "default_lower")]
        lower_percentile: f64,
        #[serde(default = "default_upper")]
        upper_percentile: f64,
    },
    /// Apply `ln(1 + x)`.
    LogTransform { columns: Vec<String> },
    /// Winsorize tails.
    Winsorize {
        columns: Vec<String>,
        #[serde(default = "default_limits")]
        limits: (f64, f64),
    },
    /// Add boolean outlier flags.
    Flag {
        columns: Vec<String>,
        #[serde(default = "default_method")]
        method: OutlierMethod,
        #[serde(default = "default_lower")]
        lower_percentile: f64,
        #[serde(default = "default_upper")]
        upper_percentile: f64,
    },
    /// Remove rows with `z >= threshold`.
    RemoveZscore {
        columns: Vec<String>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// Replace values with `|z| >= threshold` by the median.
    ClipZscore {
        columns: Vec<String>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl TreatmentStep {
    /// Columns this step touches.
    pub fn columns(&self) -> &[String] {
        match self {
            TreatmentStep::RemoveIqr { columns }
            | TreatmentStep::RemovePercentile { columns, .. }
            | TreatmentStep::Clip { columns, .. }
            | TreatmentStep::LogTransform { columns }
            | TreatmentStep::Winsorize { columns, .. }
            | TreatmentStep::Flag { columns, .. }
            | TreatmentStep::RemoveZscore { columns, .. }
            | TreatmentStep::ClipZscore { columns, .. } => columns,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TreatmentStep::RemoveIqr { .. } => "remove_iqr",
            TreatmentStep::RemovePercentile { .. } => "remove_percentile",
            TreatmentStep::Clip { .. } => "clip",
            TreatmentStep::LogTransform { .. } => "log_transform",
            TreatmentStep::Winsorize { .. } => "winsorize",
            TreatmentStep::Flag { .. } => "flag",
            TreatmentStep::RemoveZscore { .. } => "remove_zscore",
            TreatmentStep::ClipZscore { .. } => "clip_zscore",
        }
    }
}

/// Named sequence of treatment steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    /// Name of the plan.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Steps to execute, in order.
    pub steps: Vec<TreatmentStep>,
}

impl TreatmentPlan {
    /// Create an empty plan.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: TreatmentStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(EdaError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(EdaError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(EdaError::from)
    }

    /// Save to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(EdaError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_with_defaults() {
        let yaml = r#"
name: sales-cleanup
steps:
  - step: clip
    columns: [price]
  - step: remove_zscore
    columns: [quantity, discount]
  - step: winsorize
    columns: [margin]
    limits: [0.1, 0.2]
"#;
        let plan = TreatmentPlan::from_yaml(yaml).unwrap();

        assert_eq!(plan.name, "sales-cleanup");
        assert_eq!(plan.description, None);
        assert_eq!(
            plan.steps[0],
            TreatmentStep::Clip {
                columns: vec!["price".to_string()],
                method: OutlierMethod::Iqr,
                lower_percentile: 0.05,
                upper_percentile: 0.95,
            }
        );
        assert_eq!(
            plan.steps[1],
            TreatmentStep::RemoveZscore {
                columns: vec!["quantity".to_string(), "discount".to_string()],
                threshold: 3.0,
            }
        );
        assert_eq!(
            plan.steps[2],
            TreatmentStep::Winsorize {
                columns: vec!["margin".to_string()],
                limits: (0.1, 0.2),
            }
        );
    }

    #[test]
    fn test_method_by_name() {
        let yaml = r#"
name: flags
steps:
  - step: flag
    columns: [x]
    method: percentile
    lower_percentile: 0.01
"#;
        let plan = TreatmentPlan::from_yaml(yaml).unwrap();
        match &plan.steps[0] {
            TreatmentStep::Flag {
                method,
                lower_percentile,
                upper_percentile,
                ..
            } => {
                assert_eq!(*method, OutlierMethod::Percentile);
                assert_eq!(*lower_percentile, 0.01);
                assert_eq!(*upper_percentile, 0.95);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let yaml = r#"
name: bad
steps:
  - step: clip
    columns: [x]
    method: mad
"#;
        assert!(matches!(
            TreatmentPlan::from_yaml(yaml),
            Err(EdaError::Yaml(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let plan = TreatmentPlan::new("p")
            .step(TreatmentStep::LogTransform {
                columns: vec!["income".to_string()],
            })
            .step(TreatmentStep::RemoveIqr {
                columns: vec!["age".to_string()],
            });

        let json = plan.to_json().unwrap();
        assert!(json.contains("\"step\": \"log_transform\""));
        assert_eq!(TreatmentPlan::from_json(&json).unwrap(), plan);
        assert_eq!(plan.steps[1].columns(), &["age".to_string()]);
        assert_eq!(plan.steps[0].name(), "log_transform");
    }
}
