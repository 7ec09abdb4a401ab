//! Flow metrics (DORA-style delivery indicators)

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Delivery performance metrics attached to a team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Median days from commit to production (≥ 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<f64>,
    /// Deployment cadence, stored as written (`Daily`, `weekly`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_frequency: Option<String>,
    /// Share of deployments causing failures, 0.0 to 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_fail_rate: Option<f64>,
    /// Mean time to recovery in hours (≥ 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mttr_hours: Option<f64>,
}

/// Accepted deployment cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl DeploymentFrequency {
    pub const ALL: [DeploymentFrequency; 4] = [
        DeploymentFrequency::Daily,
        DeploymentFrequency::Weekly,
        DeploymentFrequency::Monthly,
        DeploymentFrequency::Quarterly,
    ];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl Display for DeploymentFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentFrequency {
    type Err = String;

    /// Case-insensitive parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| s.to_string())
    }
}

/// A single out-of-range or mistyped flow metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMetricViolation {
    /// Offending field name
    pub field: &'static str,
    /// Human-readable constraint
    pub reason: String,
}

impl FlowMetricViolation {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl FlowMetrics {
    /// Check every present field of a raw `flow_metrics` mapping
    ///
    /// Fields are checked in a fixed order and the first violation is
    /// returned. Absent fields are fine; unknown keys are ignored.
    ///
    /// # Errors
    /// Returns the first [`FlowMetricViolation`] found.
    pub fn validate_mapping(raw: &Mapping) -> Result<(), FlowMetricViolation> {
        if let Some(value) = raw.get("lead_time_days") {
            match value.as_f64() {
                Some(days) if days >= 0.0 => {}
                _ => {
                    return Err(FlowMetricViolation::new(
                        "lead_time_days",
                        "must be non-negative number",
                    ))
                }
            }
        }

        if let Some(value) = raw.get("change_fail_rate") {
            match value.as_f64() {
                Some(rate) if (0.0..=1.0).contains(&rate) => {}
                _ => {
                    return Err(FlowMetricViolation::new(
                        "change_fail_rate",
                        "must be between 0.0 and 1.0",
                    ))
                }
            }
        }

        if let Some(value) = raw.get("mttr_hours") {
            match value.as_f64() {
                Some(hours) if hours >= 0.0 => {}
                _ => {
                    return Err(FlowMetricViolation::new(
                        "mttr_hours",
                        "must be non-negative number",
                    ))
                }
            }
        }

        if let Some(value) = raw.get("deployment_frequency") {
            let valid = value
                .as_str()
                .is_some_and(|s| s.parse::<DeploymentFrequency>().is_ok());
            if !valid {
                let allowed: Vec<&str> =
                    DeploymentFrequency::ALL.iter().map(|f| f.as_str()).collect();
                return Err(FlowMetricViolation::new(
                    "deployment_frequency",
                    format!("must be one of {}", allowed.join(", ")),
                ));
            }
        }

        Ok(())
    }

    /// Parsed cadence, if present and recognised
    #[must_use]
    pub fn frequency(&self) -> Option<DeploymentFrequency> {
        self.deployment_frequency.as_deref()?.parse().ok()
    }

    /// Whether no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lead_time_days.is_none()
            && self.deployment_frequency.is_none()
            && self.change_fail_rate.is_none()
            && self.mttr_hours.is_none()
    }

    /// Render back into a YAML mapping (only present fields)
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();
        if let Some(days) = self.lead_time_days {
            map.insert(Value::from("lead_time_days"), Value::from(days));
        }
        if let Some(freq) = &self.deployment_frequency {
            map.insert(Value::from("deployment_frequency"), Value::from(freq.as_str()));
        }
        if let Some(rate) = self.change_fail_rate {
            map.insert(Value::from("change_fail_rate"), Value::from(rate));
        }
        if let Some(hours) = self.mttr_hours {
            map.insert(Value::from("mttr_hours"), Value::from(hours));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn negative_lead_time_is_rejected() {
        let err = FlowMetrics::validate_mapping(&mapping("lead_time_days: -1")).unwrap_err();
        assert_eq!(err.field, "lead_time_days");
    }

    #[test]
    fn fail_rate_above_one_is_rejected() {
        let err = FlowMetrics::validate_mapping(&mapping("change_fail_rate: 1.5")).unwrap_err();
        assert_eq!(err.field, "change_fail_rate");
    }

    #[test]
    fn fail_rate_bounds_are_inclusive() {
        assert!(FlowMetrics::validate_mapping(&mapping("change_fail_rate: 0")).is_ok());
        assert!(FlowMetrics::validate_mapping(&mapping("change_fail_rate: 1.0")).is_ok());
    }

    #[test]
    fn non_numeric_mttr_is_rejected() {
        let err = FlowMetrics::validate_mapping(&mapping("mttr_hours: soon")).unwrap_err();
        assert_eq!(err.field, "mttr_hours");
    }

    #[test]
    fn frequency_is_case_insensitive() {
        assert!(FlowMetrics::validate_mapping(&mapping("deployment_frequency: DAILY")).is_ok());
        let err =
            FlowMetrics::validate_mapping(&mapping("deployment_frequency: hourly")).unwrap_err();
        assert_eq!(err.field, "deployment_frequency");
    }

    #[test]
    fn frequency_keeps_original_casing() {
        let metrics: FlowMetrics =
            serde_yaml::from_str("deployment_frequency: Weekly\nlead_time_days: 3").unwrap();
        assert_eq!(metrics.deployment_frequency.as_deref(), Some("Weekly"));
        assert_eq!(metrics.frequency(), Some(DeploymentFrequency::Weekly));
        assert_eq!(metrics.lead_time_days, Some(3.0));
    }

    #[test]
    fn to_mapping_skips_absent_fields() {
        let metrics = FlowMetrics {
            mttr_hours: Some(2.5),
            ..FlowMetrics::default()
        };
        let map = metrics.to_mapping();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("mttr_hours").and_then(Value::as_f64), Some(2.5));
    }
}
