use crossbeam_channel::Sender;
use egui::{Color32, RichText, Ui};

use crate::config::FrequencyPreset;
use crate::core::controller::Selection;
use crate::core::oscillator::WaveformKind;
use crate::messaging::ControlMessage;
use crate::ui::components::WaveformPlot;
use crate::utils::audio_visualizer;
use crate::utils::helpers::{format_frequency, parse_custom_frequency};

const PREVIEW_SAMPLES: usize = 128;

/// Which entry of the frequency picker is selected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyChoice {
    Preset(usize),
    Custom,
}

impl FrequencyChoice {
    /// Preset whose frequency matches `hz`, otherwise custom
    pub fn for_frequency(presets: &[FrequencyPreset], hz: f32) -> Self {
        presets
            .iter()
            .position(|p| p.hz == hz)
            .map(FrequencyChoice::Preset)
            .unwrap_or(FrequencyChoice::Custom)
    }

    pub fn resolve(&self, presets: &[FrequencyPreset], custom_input: &str) -> f32 {
        match self {
            FrequencyChoice::Preset(idx) => match presets.get(*idx) {
                Some(preset) => preset.hz,
                None => parse_custom_frequency(custom_input),
            },
            FrequencyChoice::Custom => parse_custom_frequency(custom_input),
        }
    }
}

/// Frequency, waveform and volume widgets plus the start/stop buttons.
/// Every change is sent as a [`ControlMessage`]; nothing is applied here.
pub struct ControlsPanel {
    sender: Sender<ControlMessage>,
    presets: Vec<FrequencyPreset>,
    choice: FrequencyChoice,
    custom_input: String,
}

impl ControlsPanel {
    pub fn new(sender: Sender<ControlMessage>, presets: Vec<FrequencyPreset>, initial: &Selection) -> Self {
        let choice = FrequencyChoice::for_frequency(&presets, initial.frequency_hz);
        let custom_input = match choice {
            FrequencyChoice::Custom => initial.frequency_hz.to_string(),
            FrequencyChoice::Preset(_) => String::new(),
        };
        Self { sender, presets, choice, custom_input }
    }

    #[cfg(test)]
    pub fn choice(&self) -> FrequencyChoice {
        self.choice
    }

    pub fn show(&mut self, ui: &mut Ui, selection: &Selection, start_enabled: bool, stop_enabled: bool) {
        ui.heading("Frequency Controls");
        ui.add_space(4.0);

        self.show_frequency_picker(ui);

        ui.add_space(8.0);
        let mut volume = selection.volume_percent;
        if ui.add(egui::Slider::new(&mut volume, 0..=100).suffix("%").text("Volume")).changed() {
            self.send(ControlMessage::SetVolume(volume));
        }

        ui.add_space(8.0);
        let mut waveform = selection.waveform;
        ui.horizontal(|ui| {
            ui.label("Waveform:");
            egui::ComboBox::from_id_salt("waveform_kind")
                .selected_text(waveform.label())
                .show_ui(ui, |ui| {
                    for kind in WaveformKind::ALL {
                        if ui.selectable_value(&mut waveform, kind, kind.label()).changed() {
                            self.send(ControlMessage::SetWaveform(kind));
                        }
                    }
                });
        });

        WaveformPlot::new(audio_visualizer::generate_waveform_preview(waveform, PREVIEW_SAMPLES))
            .height(60.0)
            .show(ui, "waveform_preview");

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let start = egui::Button::new(RichText::new("▶ Start Broadcasting").strong());
            if ui.add_enabled(start_enabled, start).clicked() {
                self.send(ControlMessage::Start);
            }
            let stop = egui::Button::new("■ Stop");
            if ui.add_enabled(stop_enabled, stop).clicked() {
                self.send(ControlMessage::Stop);
            }
        });
    }

    fn show_frequency_picker(&mut self, ui: &mut Ui) {
        let selected_text = match self.choice {
            FrequencyChoice::Preset(idx) => self
                .presets
                .get(idx)
                .map(|p| p.label.clone())
                .unwrap_or_else(|| "Custom".to_string()),
            FrequencyChoice::Custom => "Custom".to_string(),
        };

        let mut choice = self.choice;
        egui::ComboBox::from_label("Frequency")
            .selected_text(selected_text)
            .width(220.0)
            .show_ui(ui, |ui| {
                for (idx, preset) in self.presets.iter().enumerate() {
                    ui.selectable_value(&mut choice, FrequencyChoice::Preset(idx), &preset.label);
                }
                ui.selectable_value(&mut choice, FrequencyChoice::Custom, "Custom");
            });

        if choice != self.choice {
            self.choice = choice;
            self.send_frequency();
        }

        if self.choice == FrequencyChoice::Custom {
            ui.horizontal(|ui| {
                ui.label("Custom Hz:");
                let response = ui.add(egui::TextEdit::singleline(&mut self.custom_input).desired_width(80.0));
                if response.changed() {
                    self.send_frequency();
                }
            });
            let resolved = self.choice.resolve(&self.presets, &self.custom_input);
            ui.label(RichText::new(format!("→ {}", format_frequency(resolved))).color(Color32::GRAY).small());
        }
    }

    fn send_frequency(&self) {
        let hz = self.choice.resolve(&self.presets, &self.custom_input);
        self.send(ControlMessage::SetFrequency(hz));
    }

    fn send(&self, msg: ControlMessage) {
        if self.sender.send(msg).is_err() {
            log::warn!("Control bus closed; dropping widget input");
        }
    }
}
