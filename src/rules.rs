//! Advisory threshold rules
//!
//! Fixed-threshold hints computed next to the classifier result. They are
//! reported alongside a classification and never replace one.

use serde::{Deserialize, Serialize};

use crate::models::SensorSample;

// ============================================================================
// THRESHOLDS
// ============================================================================

pub const ANOMALY_CURRENT_MAX: f64 = 50.0;
pub const ANOMALY_VOLTAGE_MAX: f64 = 250.0;
pub const ANOMALY_TEMPERATURE_MAX: f64 = 100.0;

/// Temperature above which bearings are considered at risk
pub const BEARING_RISK_TEMPERATURE: f64 = 80.0;

pub const OVERLOAD_CURRENT: f64 = 40.0;
pub const OVERLOAD_TEMPERATURE: f64 = 90.0;
pub const GROUND_FAULT_VOLTAGE: f64 = 100.0;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// A reading exceeded its spike threshold
    pub anomaly: bool,
    pub risk: RiskLevel,
    /// Rule-of-thumb fault hint, if any rule fired
    pub hint: Option<String>,
}

// ============================================================================
// RULES
// ============================================================================

pub fn assess(sample: &SensorSample) -> Assessment {
    let anomaly = sample.current > ANOMALY_CURRENT_MAX
        || sample.voltage > ANOMALY_VOLTAGE_MAX
        || sample.temperature > ANOMALY_TEMPERATURE_MAX;

    let risk = if sample.temperature > BEARING_RISK_TEMPERATURE {
        RiskLevel::High
    } else {
        RiskLevel::Low
    };

    let hint = if sample.current > OVERLOAD_CURRENT && sample.temperature > OVERLOAD_TEMPERATURE {
        Some("Motor winding overload".to_string())
    } else if sample.voltage < GROUND_FAULT_VOLTAGE {
        Some("Field ground fault".to_string())
    } else {
        None
    };

    Assessment { anomaly, risk, hint }
}
