use egui::{Color32, RichText, Sense, Stroke, Ui, Vec2};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::core::tick::Tick;
use crate::core::engine::ToneEngine;
use crate::core::scheduler::{Scheduler, TaskHandle};
use crate::core::session::{format_duration, SessionClock};
use crate::ui::components::TrailCanvas;
use crate::utils::audio_visualizer::trace_points;
use crate::utils::helpers::format_frequency;

pub const ACTIVE_COLOR: Color32 = Color32::from_rgb(0x00, 0xd4, 0xff);
pub const INACTIVE_COLOR: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
pub const SYNCING_COLOR: Color32 = Color32::from_rgb(0xff, 0xaa, 0x00);

pub const ACTIVE_STATUS: &str = "Active - Broadcasting";
pub const INACTIVE_STATUS: &str = "Inactive";
pub const CONNECTED_LABEL: &str = "Connected to Omniverse Protocol";
pub const SYNCING_LABEL: &str = "Synchronizing...";

const DIMENSIONS: [&str; 6] = [
    "Dimension-1", "Dimension-2", "Dimension-3",
    "Dimension-4", "Dimension-5", "Dimension-∞",
];

/// Text with a display color
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub text: String,
    pub color: Color32,
}

impl Indicator {
    fn new(text: &str, color: Color32) -> Self {
        Self { text: text.to_string(), color }
    }
}

/// Oscilloscope view plus session readouts
pub struct VisualizationPanel {
    canvas: TrailCanvas,
    clock: SessionClock,
    duration_task: Option<TaskHandle>,
    render_task: Option<TaskHandle>,
    render_period: Duration,
    duration_period: Duration,
    fade_alpha: f32,
    trace_stroke: Stroke,
    status: Indicator,
    sync: Indicator,
    frequency_readout: String,
    duration_readout: String,
    platform: String,
}

impl VisualizationPanel {
    pub fn new(config: &AppConfig, platform: String) -> Self {
        Self {
            canvas: TrailCanvas::new(Vec2::new(config.canvas_width, config.canvas_height)),
            clock: SessionClock::default(),
            duration_task: None,
            render_task: None,
            render_period: config.render_period(),
            duration_period: config.duration_period(),
            fade_alpha: config.trail_fade_alpha,
            trace_stroke: Stroke::new(config.trace_line_width, ACTIVE_COLOR),
            status: Indicator::new(INACTIVE_STATUS, INACTIVE_COLOR),
            sync: Indicator::new(SYNCING_LABEL, SYNCING_COLOR),
            frequency_readout: format_frequency(0.0),
            duration_readout: format_duration(Duration::ZERO),
            platform,
        }
    }

    /// Starts the duration and render tasks
    pub fn begin_session(&mut self, now: Instant, scheduler: &mut Scheduler<Tick>) {
        self.cancel_tasks(scheduler);

        self.clock.start(now);
        self.update_status_text(ACTIVE_STATUS, ACTIVE_COLOR);
        self.duration_task = Some(scheduler.every(now, self.duration_period, Tick::SessionDuration));
        self.render_task = Some(scheduler.every(now, self.render_period, Tick::Render));
    }

    /// Cancels both tasks and resets the surface and readouts
    pub fn end_session(&mut self, scheduler: &mut Scheduler<Tick>) {
        self.cancel_tasks(scheduler);

        self.canvas.clear();
        self.clock.clear();
        self.duration_readout = format_duration(Duration::ZERO);
        self.update_status_text(INACTIVE_STATUS, INACTIVE_COLOR);
    }

    /// Fades the previous frame and draws the engine's current waveform.
    /// Skipped entirely while the engine is silent, so the last frame stays.
    pub fn render_tick(&mut self, engine: &ToneEngine) {
        if !engine.is_playing() {
            return;
        }
        let Some(sample) = engine.waveform_sample() else {
            return;
        };

        self.canvas.fade(self.fade_alpha);
        let points = trace_points(&sample, self.canvas.size());
        self.canvas.stroke_path(points, self.trace_stroke);
    }

    pub fn duration_tick(&mut self, now: Instant) {
        if let Some(elapsed) = self.clock.elapsed(now) {
            self.duration_readout = format_duration(elapsed);
        }
    }

    pub fn update_status_text(&mut self, text: &str, color: Color32) {
        self.status = Indicator::new(text, color);
    }

    pub fn update_frequency_readout(&mut self, frequency_hz: f32) {
        self.frequency_readout = format_frequency(frequency_hz);
    }

    pub fn update_sync_indicator(&mut self, connected: bool) {
        self.sync = if connected {
            Indicator::new(CONNECTED_LABEL, ACTIVE_COLOR)
        } else {
            Indicator::new(SYNCING_LABEL, SYNCING_COLOR)
        };
    }

    pub fn status(&self) -> &Indicator {
        &self.status
    }

    pub fn sync(&self) -> &Indicator {
        &self.sync
    }

    pub fn frequency_readout(&self) -> &str {
        &self.frequency_readout
    }

    pub fn duration_readout(&self) -> &str {
        &self.duration_readout
    }

    pub fn canvas(&self) -> &TrailCanvas {
        &self.canvas
    }

    pub fn show(&self, ui: &mut Ui) {
        ui.heading("Resonance Dashboard");

        egui::Grid::new("dashboard_readouts")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.label("Status:");
                ui.label(RichText::new(&self.status.text).color(self.status.color).strong());
                ui.end_row();

                ui.label("Current Frequency:");
                ui.label(RichText::new(&self.frequency_readout).monospace());
                ui.end_row();

                ui.label("Session Duration:");
                ui.label(RichText::new(&self.duration_readout).monospace());
                ui.end_row();

                ui.label("Platform:");
                ui.label(&self.platform);
                ui.end_row();
            });

        ui.add_space(8.0);

        let width = ui.available_width();
        let size = self.canvas.size();
        let desired = Vec2::new(width, width * size.y / size.x);
        let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
        if ui.is_rect_visible(rect) {
            self.canvas.paint(ui.painter(), rect);
        }

        ui.add_space(8.0);
        ui.label(RichText::new(&self.sync.text).color(self.sync.color));

        ui.horizontal_wrapped(|ui| {
            ui.label("Broadcasting to:");
            for dimension in DIMENSIONS {
                ui.label(RichText::new(dimension).color(ACTIVE_COLOR).small());
            }
        });
    }

    fn cancel_tasks(&mut self, scheduler: &mut Scheduler<Tick>) {
        if let Some(handle) = self.duration_task.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.render_task.take() {
            scheduler.cancel(handle);
        }
    }
}
