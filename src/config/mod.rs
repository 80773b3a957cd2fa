// src/config/mod.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use crate::error::{MonitorError, Result};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub receiver: ReceiverConfig,
    pub window: WindowConfig,
    pub display: DisplayConfig,
    pub sensor: SensorConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReceiverConfig {
    pub bind_address: String,
    pub port: u16,
    pub poll_interval_ms: u64,
    pub max_datagram_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            poll_interval_ms: 200,
            max_datagram_size: 1024,
        }
    }
}

impl ReceiverConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        resolve(&format!("{}:{}", self.bind_address, self.port))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub window_seconds: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_seconds: 30.0,
        }
    }
}

impl WindowConfig {
    /// The window must be a positive, finite duration or eviction never runs.
    pub fn validate(&self) -> Result<()> {
        if self.window_seconds.is_finite() && self.window_seconds > 0.0 {
            Ok(())
        } else {
            Err(MonitorError::InvalidConfig(format!(
                "window_seconds must be a positive number of seconds, got {}",
                self.window_seconds
            )))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_width: 900,
            window_height: 500,
            title: "IR Sensor Interface".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    pub adc_path: String,
    /// Readings at or below this value mean something is in front of the sensor.
    /// The channel reads 65535 at 3.3V (nothing there) and around 3000 otherwise.
    pub threshold: i64,
    pub target_address: String,
    pub interval_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            adc_path: "/sys/bus/iio/devices/iio:device0/in_voltage13_raw".to_string(),
            threshold: 60000,
            target_address: "127.0.0.1:5000".to_string(),
            interval_ms: 1000,
        }
    }
}

impl SensorConfig {
    pub fn target_addr(&self) -> Result<SocketAddr> {
        resolve(&self.target_address)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub interval_ms: u64,
    pub obstruction_probability: f64,
    pub obstruction_samples: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            obstruction_probability: 0.05,
            obstruction_samples: 10,
        }
    }
}

fn resolve(address: &str) -> Result<SocketAddr> {
    address
        .to_socket_addrs()
        .map_err(|e| MonitorError::InvalidAddress(format!("{}: {}", address, e)))?
        .next()
        .ok_or_else(|| MonitorError::InvalidAddress(address.to_string()))
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.window.validate()
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;

    let config: Config = serde_yaml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;

    fs::write(path, yaml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let config = Config::default();
        assert_eq!(config.receiver.port, 5000);
        assert_eq!(config.receiver.poll_interval_ms, 200);
        assert_eq!(config.window.window_seconds, 30.0);
        assert_eq!(config.sensor.threshold, 60000);
        assert_eq!(
            config.receiver.socket_addr().unwrap(),
            "0.0.0.0:5000".parse().unwrap()
        );
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: Config = serde_yaml::from_str("receiver:\n  port: 6000\n").unwrap();
        assert_eq!(config.receiver.port, 6000);
        assert_eq!(config.receiver.bind_address, "0.0.0.0");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.yaml");

        let mut config = Config::default();
        config.window.window_seconds = 10.0;
        config.sensor.target_address = "192.168.7.2:5000".to_string();
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn window_must_be_positive_and_finite() {
        for value in [".nan", ".inf", "-.inf", "-1", "0"] {
            let yaml = format!("window:\n  window_seconds: {}\n", value);
            let config: Config = serde_yaml::from_str(&yaml).unwrap();
            assert!(
                matches!(config.validate(), Err(MonitorError::InvalidConfig(_))),
                "window_seconds {} was accepted",
                value
            );
        }

        let config: Config = serde_yaml::from_str("window:\n  window_seconds: 0.5\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_rejects_unbounded_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.yaml");
        fs::write(&path, "window:\n  window_seconds: .nan\n").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(MonitorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bad_target_address_is_rejected() {
        let mut config = SensorConfig::default();
        config.target_address = "not an address".to_string();
        assert!(matches!(
            config.target_addr(),
            Err(MonitorError::InvalidAddress(_))
        ));
    }
}
