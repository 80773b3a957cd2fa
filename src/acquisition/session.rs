use std::time::Instant;

use super::message::decode_datagram;
use super::receiver::UdpReceiver;
use super::window::SampleWindow;
use super::Sample;
use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The session is stopped; the socket was not touched.
    Idle,
    NoData,
    /// A datagram arrived but could not be parsed.
    Dropped,
    Appended(Sample),
}

/// Everything the monitor mutates between ticks.
///
/// Starting again after a stop resets the time origin but keeps the samples
/// already in the window.
pub struct Session {
    receiver: UdpReceiver,
    window: SampleWindow,
    running: bool,
    started_at: Option<Instant>,
    current: Option<Sample>,
}

impl Session {
    pub fn new(receiver: UdpReceiver, window_seconds: f64) -> Self {
        Self {
            receiver,
            window: SampleWindow::new(window_seconds),
            running: false,
            started_at: None,
            current: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.window.validate()?;
        let receiver = UdpReceiver::bind(
            config.receiver.socket_addr()?,
            config.receiver.max_datagram_size,
        )?;
        Ok(Self::new(receiver, config.window.window_seconds))
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.running = true;
        self.started_at = Some(now);
        log::info!("Acquisition started ({} samples kept)", self.window.len());
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.current = None;
        log::info!("Acquisition stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// Latest sample received since the last start.
    pub fn current(&self) -> Option<&Sample> {
        self.current.as_ref()
    }

    pub fn receiver(&self) -> &UdpReceiver {
        &self.receiver
    }

    pub fn poll(&mut self) -> Result<PollOutcome> {
        self.poll_at(Instant::now())
    }

    /// Reads at most one datagram.
    pub fn poll_at(&mut self, now: Instant) -> Result<PollOutcome> {
        if !self.running {
            return Ok(PollOutcome::Idle);
        }

        match self.receiver.try_recv()? {
            Some(payload) => Ok(self.ingest_at(&payload, now)),
            None => Ok(PollOutcome::NoData),
        }
    }

    pub fn ingest_at(&mut self, payload: &[u8], now: Instant) -> PollOutcome {
        let reading = match decode_datagram(payload) {
            Ok(reading) => reading,
            Err(e) => {
                log::debug!(
                    "Dropping datagram {:?}: {}",
                    String::from_utf8_lossy(payload),
                    e
                );
                return PollOutcome::Dropped;
            }
        };

        let origin = *self.started_at.get_or_insert(now);
        let t = now.saturating_duration_since(origin).as_secs_f64();
        let sample = Sample::new(t, reading);

        self.window.push(sample.clone());
        self.current = Some(sample.clone());
        PollOutcome::Appended(sample)
    }
}
