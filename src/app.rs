use eframe::egui;
use std::time::Instant;

use crate::config::AppConfig;
use crate::core::controller::{AppController, Collaborators};
use crate::core::engine::{CpalHost, ToneEngine};
use crate::core::scheduler::Scheduler;
use crate::core::tick::Tick;
use crate::messaging::MessageBus;
use crate::ui::panels::{ControlsPanel, VisualizationPanel};
use crate::utils::helpers::platform_descriptor;

// Bounds the work done per frame if widgets flood the bus
const MAX_MESSAGES_PER_FRAME: usize = 64;

// Main app state
pub struct BroadcasterApp {
    engine: ToneEngine,
    panel: VisualizationPanel,
    controls: ControlsPanel,
    controller: AppController,
    scheduler: Scheduler<Tick>,
    message_bus: MessageBus,
    notice: Option<String>,
    should_exit: bool,
}

impl eframe::App for BroadcasterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_messages(now);
        self.run_due_tasks(now);

        if self.notice.is_none() {
            self.notice = self.controller.take_notification();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Galactic Frequency Broadcaster");
                ui.label("🌌");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("❌ Exit").clicked() {
                        self.should_exit = true;
                    }
                });
            });
        });

        let blocked = self.notice.is_some();

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    let selection = self.controller.selection();
                    self.controls.show(
                        ui,
                        &selection,
                        self.controller.start_enabled(),
                        self.controller.stop_enabled(),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.panel.show(ui);
        });

        self.show_notice(ctx);

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // Wake up for the next scheduled tick instead of spinning
        if let Some(deadline) = self.scheduler.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}

impl BroadcasterApp {
    pub fn new(config: AppConfig) -> Self {
        let message_bus = MessageBus::new();
        let host = CpalHost::new(message_bus.sender());
        let mut engine = ToneEngine::new(Box::new(host), config.engine_settings());

        let mut controller = AppController::new(&config);
        controller.initialize(&mut engine);

        let controls = ControlsPanel::new(message_bus.sender(), config.presets.clone(), &controller.selection());
        let panel = VisualizationPanel::new(&config, platform_descriptor());

        log::info!("Galactic Frequency Broadcaster ready on {}", platform_descriptor());

        Self {
            engine,
            panel,
            controls,
            controller,
            scheduler: Scheduler::new(),
            message_bus,
            notice: None,
            should_exit: false,
        }
    }

    fn process_messages(&mut self, now: Instant) {
        for msg in self.message_bus.drain(MAX_MESSAGES_PER_FRAME) {
            log::debug!("Handling {:?}", msg);
            let mut cx = Collaborators {
                engine: &mut self.engine,
                panel: &mut self.panel,
                scheduler: &mut self.scheduler,
                now,
            };
            self.controller.handle(msg, &mut cx);
        }
    }

    fn run_due_tasks(&mut self, now: Instant) {
        while let Some(tick) = self.scheduler.pop_due(now) {
            let mut cx = Collaborators {
                engine: &mut self.engine,
                panel: &mut self.panel,
                scheduler: &mut self.scheduler,
                now,
            };
            self.controller.on_tick(tick, &mut cx);
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.as_deref() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notice = None;
        }
    }
}
