// src/acquisition/mod.rs

pub mod message;
pub mod receiver;
pub mod session;
pub mod window;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorStatus {
    Clear,
    Obstructed,
    /// Any other token the sensor sent, already upper-cased.
    Other(String),
}

impl SensorStatus {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_uppercase().as_str() {
            "CLEAR" => SensorStatus::Clear,
            "OBSTRUCTED" => SensorStatus::Obstructed,
            other => SensorStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SensorStatus::Clear => "CLEAR",
            SensorStatus::Obstructed => "OBSTRUCTED",
            SensorStatus::Other(token) => token,
        }
    }

    pub fn is_obstructed(&self) -> bool {
        matches!(self, SensorStatus::Obstructed)
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SensorStatus {
    fn from(token: String) -> Self {
        SensorStatus::from_token(&token)
    }
}

impl From<SensorStatus> for String {
    fn from(status: SensorStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One decoded sensor message, before it is placed on the time axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub adc: i64,
    pub status: SensorStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Seconds since the acquisition was started.
    pub t: f64,
    pub adc: i64,
    pub status: SensorStatus,
}

impl Sample {
    pub fn new(t: f64, reading: Reading) -> Self {
        Self {
            t,
            adc: reading.adc,
            status: reading.status,
        }
    }
}
