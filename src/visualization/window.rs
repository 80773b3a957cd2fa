// src/visualization/window.rs

use super::{DisplayState, Indicator};
use crate::acquisition::session::{PollOutcome, Session};
use crate::config::Config;
use crate::error::{MonitorError, Result};
use crate::export::save_csv;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct MonitorApp {
    session: Session,
    display: DisplayState,
    save_path: String,
    poll_interval: Duration,
    last_poll: Option<Instant>,
}

impl MonitorApp {
    pub fn new(session: Session, config: &Config) -> Self {
        Self {
            session,
            display: DisplayState::default(),
            save_path: default_save_path(),
            poll_interval: Duration::from_millis(config.receiver.poll_interval_ms),
            last_poll: None,
        }
    }

    pub fn run(session: Session, config: &Config) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([
                    config.display.window_width as f32,
                    config.display.window_height as f32,
                ])
                .with_title(config.display.title.clone()),
            ..Default::default()
        };

        let app = MonitorApp::new(session, config);
        eframe::run_native(
            &config.display.title,
            options,
            Box::new(move |_cc| Ok(Box::new(app))),
        )
        .map_err(|e| MonitorError::Gui(e.to_string()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn set_save_path(&mut self, path: impl Into<String>) {
        self.save_path = path.into();
    }

    pub fn on_start(&mut self) {
        self.on_start_at(Instant::now());
    }

    pub fn on_start_at(&mut self, now: Instant) {
        self.session.start_at(now);
        self.display.on_start();
        self.last_poll = None;
    }

    pub fn on_stop(&mut self) {
        self.session.stop();
        self.display.on_stop();
    }

    /// Polls the socket once the poll interval has elapsed. Returns whether a
    /// poll happened.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.session.is_running() {
            return false;
        }
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.poll_interval {
                return false;
            }
        }
        self.last_poll = Some(now);

        match self.session.poll_at(now) {
            Ok(PollOutcome::Appended(sample)) => self.display.on_sample(&sample),
            Ok(_) => {}
            Err(e) => log::warn!("Socket receive failed: {}", e),
        }
        true
    }

    /// An empty path is treated like a cancelled save dialog.
    pub fn on_save(&mut self) -> Result<Option<PathBuf>> {
        let trimmed = self.save_path.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let path = PathBuf::from(trimmed);
        save_csv(&path, self.session.window())?;
        self.display.on_saved(&path);
        Ok(Some(path))
    }

    fn plot(&self, ui: &mut egui::Ui) {
        use egui_plot::{Line, Plot, PlotPoints};

        let window = self.session.window();
        let points = PlotPoints::new(window.relative_points());
        let line = Line::new(points)
            .color(self.display.indicator.line_color())
            .width(2.0)
            .name("ADC");

        Plot::new("sensor_data")
            .x_axis_label("Time")
            .y_axis_label("ADC value")
            // Positions along the window are meaningful, absolute seconds are not.
            .x_axis_formatter(|_, _| String::new())
            .show_grid([true, true])
            .include_x(0.0)
            .include_x(window.window_seconds())
            .set_margin_fraction(egui::vec2(0.0, 0.05))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.on_tick(Instant::now()) {
            log::trace!("{} samples in window", self.session.window().len());
        }
        if self.session.is_running() {
            ctx.request_repaint_after(self.poll_interval);
        }

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.label(egui::RichText::new(&self.display.status_line).size(18.0));

            let indicator = self.display.indicator;
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(indicator.label())
                        .size(22.0)
                        .strong()
                        .color(indicator.color()),
                );
            });
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let running = self.session.is_running();
                if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
                    self.on_start();
                }
                if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
                    self.on_stop();
                }

                ui.separator();
                ui.label("CSV file:");
                ui.text_edit_singleline(&mut self.save_path);
                if ui.button("Save").clicked() {
                    if let Err(e) = self.on_save() {
                        log::error!("Failed to save {}: {}", self.save_path, e);
                    }
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.window().is_empty() && self.display.indicator == Indicator::Idle {
                ui.weak("No samples yet");
            }
            self.plot(ui);
        });
    }
}

fn default_save_path() -> String {
    chrono::Local::now()
        .format("ir_sensor_%Y%m%d_%H%M%S.csv")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::receiver::UdpReceiver;
    use crate::export::load_csv;
    use std::net::UdpSocket;

    fn app() -> MonitorApp {
        let receiver = UdpReceiver::bind("127.0.0.1:0".parse().unwrap(), 1024).unwrap();
        MonitorApp::new(Session::new(receiver, 30.0), &Config::default())
    }

    #[test]
    fn ticks_respect_the_poll_interval() {
        let mut app = app();
        let t0 = Instant::now();
        assert!(!app.on_tick(t0));

        app.on_start_at(t0);
        assert!(app.on_tick(t0));
        assert!(!app.on_tick(t0 + Duration::from_millis(100)));
        assert!(app.on_tick(t0 + Duration::from_millis(200)));

        app.on_stop();
        assert!(!app.on_tick(t0 + Duration::from_secs(1)));
        assert_eq!(app.display().status_line, "Stopped");
    }

    #[test]
    fn received_datagram_reaches_the_display() {
        let mut app = app();
        let target = app.session().receiver().local_addr().unwrap();
        let t0 = Instant::now();
        app.on_start_at(t0);

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"ADC = 2900 | STATUS = obstructed", target).unwrap();

        let mut now = t0;
        for _ in 0..200 {
            app.on_tick(now);
            if !app.session().window().is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
            now += Duration::from_millis(200);
        }

        assert_eq!(app.session().window().len(), 1);
        assert_eq!(app.display().indicator, Indicator::Obstructed);
        assert_eq!(app.display().status_line, "Status: OBSTRUCTED  |  ADC = 2900");
    }

    #[test]
    fn empty_path_skips_the_save() {
        let mut app = app();
        app.set_save_path("   ");
        assert!(app.on_save().unwrap().is_none());
        assert_eq!(app.display().status_line, "Waiting for data...");
    }

    #[test]
    fn save_writes_the_window_and_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.csv");

        let mut app = app();
        let t0 = Instant::now();
        app.on_start_at(t0);
        app.session
            .ingest_at(b"ADC = 512 | STATUS = clear", t0 + Duration::from_secs(1));
        app.set_save_path(path.display().to_string());

        assert_eq!(app.on_save().unwrap(), Some(path.clone()));
        assert_eq!(load_csv(&path).unwrap(), app.session().window().to_vec());
        assert!(app.display().status_line.starts_with("Saved to: "));
    }
}
