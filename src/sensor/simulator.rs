use rand::Rng;
use std::time::Duration;

use super::{classify, print_reading, UdpSender};
use crate::acquisition::Reading;
use crate::config::{SensorConfig, SimulatorConfig};
use crate::error::Result;

// -----------------------------------------------------------------------------
// SETUP FOR THE SIMULATED SENSOR
// -----------------------------------------------------------------------------

const CLEAR_LEVEL: i64 = 65535;
const OBSTRUCTED_LEVEL: i64 = 3000;
const CLEAR_NOISE: i64 = 400;
const OBSTRUCTED_NOISE: i64 = 150;

/// Produces sysfs-like readings with occasional obstruction episodes.
pub struct Simulator<R: Rng> {
    rng: R,
    threshold: i64,
    obstruction_probability: f64,
    obstruction_samples: usize,
    remaining_obstructed: usize,
}

impl<R: Rng> Simulator<R> {
    pub fn new(rng: R, threshold: i64, config: &SimulatorConfig) -> Self {
        Self {
            rng,
            threshold,
            obstruction_probability: config.obstruction_probability.clamp(0.0, 1.0),
            obstruction_samples: config.obstruction_samples.max(1),
            remaining_obstructed: 0,
        }
    }

    pub fn obstructed(&self) -> bool {
        self.remaining_obstructed > 0
    }

    pub fn next_reading(&mut self) -> Reading {
        if self.remaining_obstructed == 0 && self.rng.gen_bool(self.obstruction_probability) {
            self.remaining_obstructed = self.obstruction_samples;
        }

        let adc = if self.remaining_obstructed > 0 {
            self.remaining_obstructed -= 1;
            OBSTRUCTED_LEVEL + self.rng.gen_range(-OBSTRUCTED_NOISE..=OBSTRUCTED_NOISE)
        } else {
            // Saturated channel only ever dips below full scale.
            CLEAR_LEVEL - self.rng.gen_range(0..=CLEAR_NOISE)
        };

        Reading {
            adc,
            status: classify(adc, self.threshold),
        }
    }
}

// -----------------------------------------------------------------------------
// RUN CODE
// -----------------------------------------------------------------------------

pub fn run_simulator(sensor: &SensorConfig, config: &SimulatorConfig) -> Result<()> {
    let sender = UdpSender::connect(sensor.target_addr()?)?;
    let mut simulator = Simulator::new(rand::thread_rng(), sensor.threshold, config);
    let interval = Duration::from_millis(config.interval_ms);

    log::info!(
        "Simulating sensor every {:?}, sending to {}",
        interval,
        sensor.target_address
    );

    loop {
        let reading = simulator.next_reading();
        print_reading(&reading);
        if let Err(e) = sender.send(&reading) {
            log::warn!("Failed to send reading: {}", e);
        }

        std::thread::sleep(interval);
    }
}
