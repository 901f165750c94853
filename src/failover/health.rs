//! Component health reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a single named component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "HEALTHY"),
            HealthStatus::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

/// Health of one probed component, with the failure reason when unhealthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            error: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            error: Some(error.into()),
        }
    }
}

/// Aggregate health across every probed component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealth>,
}

impl HealthReport {
    /// Roll per-component statuses into one aggregate. With a single
    /// component this mirrors its status; any unhealthy component makes
    /// the aggregate unhealthy once there are more.
    pub fn aggregate(components: Vec<ComponentHealth>) -> Self {
        let status = if components
            .iter()
            .any(|component| component.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        Self { status, components }
    }

    /// Human-readable rendering for operator tooling.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.status);
        for component in &self.components {
            out.push_str(&format!(
                "\tComponent: {}\tStatus: {}",
                component.name, component.status
            ));
            if let Some(error) = &component.error {
                out.push_str(&format!("\tError: {}", error));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_single_component_mirrors_status() {
        let report = HealthReport::aggregate(vec![ComponentHealth::healthy("pgbouncer")]);
        assert_eq!(report.status, HealthStatus::Healthy);

        let report =
            HealthReport::aggregate(vec![ComponentHealth::unhealthy("pgbouncer", "refused")]);
        assert_eq!(report.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_aggregate_any_unhealthy_component_wins() {
        let report = HealthReport::aggregate(vec![
            ComponentHealth::healthy("pgbouncer"),
            ComponentHealth::unhealthy("store", "no leader"),
        ]);
        assert_eq!(report.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_render_includes_error_detail() {
        let report =
            HealthReport::aggregate(vec![ComponentHealth::unhealthy("pgbouncer", "refused")]);
        let text = report.render();

        assert!(text.starts_with("UNHEALTHY\n"));
        assert!(text.contains("Component: pgbouncer"));
        assert!(text.contains("Error: refused"));
    }
}
