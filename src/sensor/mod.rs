// src/sensor/mod.rs

pub mod simulator;

use colored::Colorize;
use std::fs;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::acquisition::message::format_message;
use crate::acquisition::{Reading, SensorStatus};
use crate::config::SensorConfig;
use crate::error::{MonitorError, Result};

pub fn classify(value: i64, threshold: i64) -> SensorStatus {
    if value <= threshold {
        SensorStatus::Obstructed
    } else {
        SensorStatus::Clear
    }
}

/// IR sensor exposed as a raw IIO ADC channel in sysfs.
pub struct IrSensor {
    path: PathBuf,
    threshold: i64,
}

impl IrSensor {
    pub fn new<P: AsRef<Path>>(adc_path: P, threshold: i64) -> Self {
        Self {
            path: adc_path.as_ref().to_path_buf(),
            threshold,
        }
    }

    pub fn read_adc(&self) -> Result<i64> {
        let read_error = |reason: String| MonitorError::SensorRead {
            path: self.path.display().to_string(),
            reason,
        };

        let raw = fs::read_to_string(&self.path).map_err(|e| read_error(e.to_string()))?;
        let value = raw.split_whitespace().next().unwrap_or_default();
        value
            .parse()
            .map_err(|_| read_error(format!("unexpected contents {:?}", raw.trim())))
    }

    pub fn read(&self) -> Result<Reading> {
        let adc = self.read_adc()?;
        Ok(Reading {
            adc,
            status: classify(adc, self.threshold),
        })
    }
}

/// Sends one text datagram per reading to the monitor.
pub struct UdpSender {
    socket: UdpSocket,
}

impl UdpSender {
    pub fn connect(target: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(target)?;
        Ok(Self { socket })
    }

    pub fn send(&self, reading: &Reading) -> io::Result<String> {
        let message = format_message(reading);
        self.socket.send(message.as_bytes())?;
        Ok(message)
    }
}

pub fn print_reading(reading: &Reading) {
    let state = if reading.status.is_obstructed() {
        "Obstacle detected!".red()
    } else {
        "No obstacle.".green()
    };
    println!("{}  sensor output: {}", state, reading.adc);
}

pub fn run_sensor(config: &SensorConfig) -> Result<()> {
    let sensor = IrSensor::new(&config.adc_path, config.threshold);
    let sender = UdpSender::connect(config.target_addr()?)?;
    let interval = Duration::from_millis(config.interval_ms);

    log::info!(
        "Reading {} every {:?}, sending to {}",
        config.adc_path,
        interval,
        config.target_address
    );

    loop {
        match sensor.read() {
            Ok(reading) => {
                print_reading(&reading);
                // The monitor may not be up yet; a refused send is just a lost sample.
                if let Err(e) = sender.send(&reading) {
                    log::warn!("Failed to send reading: {}", e);
                }
            }
            Err(e) => {
                eprintln!("{}", format!("Sensor read error: {}", e).red());
            }
        }

        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::message::parse_message;
    use std::io::Write;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(classify(60000, 60000), SensorStatus::Obstructed);
        assert_eq!(classify(3000, 60000), SensorStatus::Obstructed);
        assert_eq!(classify(60001, 60000), SensorStatus::Clear);
        assert_eq!(classify(65535, 60000), SensorStatus::Clear);
    }

    #[test]
    fn reads_sysfs_style_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "65535").unwrap();

        let sensor = IrSensor::new(file.path(), 60000);
        assert_eq!(
            sensor.read().unwrap(),
            Reading {
                adc: 65535,
                status: SensorStatus::Clear
            }
        );
    }

    #[test]
    fn missing_or_garbled_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = IrSensor::new(dir.path().join("in_voltage13_raw"), 60000);
        assert!(matches!(sensor.read_adc(), Err(MonitorError::SensorRead { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "n/a").unwrap();
        let sensor = IrSensor::new(file.path(), 60000);
        assert!(matches!(sensor.read_adc(), Err(MonitorError::SensorRead { .. })));
    }

    #[test]
    fn sender_output_is_accepted_by_the_parser() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let sender = UdpSender::connect(listener.local_addr().unwrap()).unwrap();

        let reading = Reading {
            adc: 2999,
            status: SensorStatus::Obstructed,
        };
        let sent = sender.send(&reading).unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let text = std::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(text, sent);
        assert_eq!(parse_message(text).unwrap(), reading);
    }
}
