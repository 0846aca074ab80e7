//! Sensor sample and fault record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppError;

/// Label stored when the classifier answers without a fault
pub const UNKNOWN_FAULT: &str = "Unknown";

/// Label the classifier uses for a motor without defects
pub const HEALTHY_FAULT: &str = "Healthy";

/// One reading of current, voltage and temperature.
///
/// Temperature travels as `temp` on the wire, both in request bodies and in
/// the classifier request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub current: f64,
    pub voltage: f64,
    #[serde(rename = "temp", alias = "temperature")]
    pub temperature: f64,
}

/// Body of `POST /api/sensor-data`
#[derive(Debug, Deserialize, Validate)]
pub struct SensorDataRequest {
    #[validate(required(message = "current is required"))]
    pub current: Option<f64>,
    #[validate(required(message = "voltage is required"))]
    pub voltage: Option<f64>,
    #[serde(alias = "temperature")]
    #[validate(required(message = "temp is required"))]
    pub temp: Option<f64>,
}

impl TryFrom<SensorDataRequest> for SensorSample {
    type Error = AppError;

    fn try_from(req: SensorDataRequest) -> Result<Self, Self::Error> {
        req.validate()?;

        match (req.current, req.voltage, req.temp) {
            (Some(current), Some(voltage), Some(temperature)) => Ok(Self {
                current,
                voltage,
                temperature,
            }),
            _ => Err(AppError::ValidationError(
                "current, voltage and temp are required".to_string(),
            )),
        }
    }
}

/// A persisted classification. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    pub id: i64,
    pub input: SensorSample,
    pub fault: String,
    pub timestamp: DateTime<Utc>,
}

impl FaultRecord {
    pub fn is_healthy(&self) -> bool {
        self.fault == HEALTHY_FAULT
    }

    /// Human readable summary served by the analysis endpoint
    pub fn summary(&self) -> String {
        summarize_fault(&self.fault)
    }
}

/// Render the dashboard sentence for a fault label
pub fn summarize_fault(fault: &str) -> String {
    if fault == HEALTHY_FAULT {
        "The motor is healthy no problem".to_string()
    } else {
        format!("There is a issue {} and risk in your device", fault)
    }
}
