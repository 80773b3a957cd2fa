// src/acquisition/window.rs

use super::Sample;
use std::collections::VecDeque;

/// Insertion-ordered samples whose first-to-last span never exceeds
/// `window_seconds`.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    window_seconds: f64,
}

impl SampleWindow {
    pub fn new(window_seconds: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            window_seconds,
        }
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);

        while let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) {
            if last.t - first.t > self.window_seconds {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Newest minus oldest timestamp.
    pub fn span(&self) -> Option<f64> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        Some(last.t - first.t)
    }

    /// `[t, adc]` pairs shifted so the window starts at x = 0.
    pub fn relative_points(&self) -> Vec<[f64; 2]> {
        let origin = match self.samples.front() {
            Some(first) => first.t,
            None => return Vec::new(),
        };
        self.samples
            .iter()
            .map(|s| [s.t - origin, s.adc as f64])
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(30.0)
    }
}
