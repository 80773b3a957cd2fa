// src/visualization/mod.rs

pub mod window;

use crate::acquisition::Sample;
use egui::Color32;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Idle,
    Clear,
    Obstructed,
}

impl Indicator {
    pub fn for_sample(sample: &Sample) -> Self {
        if sample.status.is_obstructed() {
            Indicator::Obstructed
        } else {
            Indicator::Clear
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Idle => "---",
            Indicator::Clear => "CLEAR",
            Indicator::Obstructed => "OBSTRUCTED",
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Indicator::Idle => Color32::GRAY,
            Indicator::Clear => Color32::GREEN,
            Indicator::Obstructed => Color32::RED,
        }
    }

    /// Plot line colour. The line stays green while idle.
    pub fn line_color(&self) -> Color32 {
        match self {
            Indicator::Obstructed => Color32::RED,
            _ => Color32::GREEN,
        }
    }
}

/// Text shown above the plot and the obstruction indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub status_line: String,
    pub indicator: Indicator,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status_line: "Waiting for data...".to_string(),
            indicator: Indicator::Idle,
        }
    }
}

impl DisplayState {
    pub fn on_start(&mut self) {
        self.status_line = "Receiving data...".to_string();
    }

    pub fn on_stop(&mut self) {
        self.status_line = "Stopped".to_string();
        self.indicator = Indicator::Idle;
    }

    pub fn on_sample(&mut self, sample: &Sample) {
        self.indicator = Indicator::for_sample(sample);
        self.status_line = format!("Status: {}  |  ADC = {}", sample.status, sample.adc);
    }

    pub fn on_saved(&mut self, path: &Path) {
        self.status_line = format!("Saved to: {}", path.display());
    }
}
