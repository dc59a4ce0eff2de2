//! Playback state machine tying the widgets to the engine and dashboard.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::core::engine::ToneEngine;
use crate::core::oscillator::WaveformKind;
use crate::core::scheduler::{Scheduler, TaskHandle};
use crate::core::tick::Tick;
use crate::messaging::ControlMessage;
use crate::ui::panels::VisualizationPanel;
use crate::utils::helpers::volume_fraction;

pub const START_FAILED_NOTICE: &str = "Failed to start broadcasting. Please try again.";
pub const UNSUPPORTED_NOTICE: &str =
    "Audio output is not available on this system. Connect an output device and restart.";
pub const STREAM_FAULT_NOTICE: &str = "Broadcasting stopped: the audio output was lost.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Values picked in the controls, applied at the next start when stopped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub frequency_hz: f32,
    pub waveform: WaveformKind,
    pub volume_percent: u8,
}

/// Everything a transition may touch, lent by the composition root
pub struct Collaborators<'a> {
    pub engine: &'a mut ToneEngine,
    pub panel: &'a mut VisualizationPanel,
    pub scheduler: &'a mut Scheduler<Tick>,
    pub now: Instant,
}

pub struct AppController {
    state: PlaybackState,
    selection: Selection,
    supported: bool,
    start_enabled: bool,
    stop_enabled: bool,
    sync_delay: Duration,
    sync_task: Option<TaskHandle>,
    notifications: VecDeque<String>,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: PlaybackState::Stopped,
            selection: Selection {
                frequency_hz: config.default_frequency_hz,
                waveform: config.default_waveform,
                volume_percent: config.default_volume_percent.min(100),
            },
            supported: true,
            start_enabled: true,
            stop_enabled: false,
            sync_delay: config.sync_delay(),
            sync_task: None,
            notifications: VecDeque::new(),
        }
    }

    /// Probes the platform once and pushes the initial volume to the engine
    pub fn initialize(&mut self, engine: &mut ToneEngine) {
        engine.set_volume(volume_fraction(self.selection.volume_percent));

        self.supported = engine.is_supported();
        if !self.supported {
            log::warn!("No audio output available; broadcasting disabled");
            self.start_enabled = false;
            self.notify(UNSUPPORTED_NOTICE);
        }
    }

    pub fn handle(&mut self, msg: ControlMessage, cx: &mut Collaborators<'_>) {
        match msg {
            ControlMessage::Start => self.start(cx),
            ControlMessage::Stop => self.stop(cx),
            ControlMessage::SetFrequency(hz) => self.change_frequency(hz, cx),
            ControlMessage::SetWaveform(kind) => self.change_waveform(kind, cx),
            ControlMessage::SetVolume(percent) => self.change_volume(percent, cx),
            ControlMessage::StreamFault(reason) => self.stream_fault(&reason, cx),
        }
    }

    pub fn on_tick(&mut self, tick: Tick, cx: &mut Collaborators<'_>) {
        match tick {
            Tick::SessionDuration => cx.panel.duration_tick(cx.now),
            Tick::Render => cx.panel.render_tick(cx.engine),
            Tick::SyncConnected => {
                self.sync_task = None;
                cx.panel.update_sync_indicator(true);
                log::info!("Connected to Galactic Federation Omniverse Protocol");
            },
        }
    }

    pub fn start(&mut self, cx: &mut Collaborators<'_>) {
        if !self.start_enabled || self.state == PlaybackState::Playing {
            log::debug!("Ignoring start request in state {:?}", self.state);
            return;
        }

        let Selection { frequency_hz, waveform, .. } = self.selection;
        if let Err(e) = cx.engine.start(frequency_hz, waveform) {
            log::error!("Failed to start broadcasting: {}", e);
            self.notify(START_FAILED_NOTICE);
            return;
        }

        self.state = PlaybackState::Playing;
        self.start_enabled = false;
        self.stop_enabled = true;

        cx.panel.begin_session(cx.now, cx.scheduler);
        cx.panel.update_frequency_readout(frequency_hz);
        cx.panel.update_sync_indicator(true);
        self.simulate_sync(cx);

        let tone = cx.engine.state();
        log::info!(
            "Broadcasting {} Hz {} wave at {:.0}% volume",
            tone.frequency_hz,
            tone.waveform,
            tone.volume * 100.0
        );
    }

    pub fn stop(&mut self, cx: &mut Collaborators<'_>) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        cx.engine.stop();
        self.state = PlaybackState::Stopped;
        self.start_enabled = self.supported;
        self.stop_enabled = false;

        if let Some(handle) = self.sync_task.take() {
            cx.scheduler.cancel(handle);
        }
        cx.panel.end_session(cx.scheduler);
        cx.panel.update_frequency_readout(0.0);

        log::info!("Broadcasting stopped");
    }

    pub fn change_frequency(&mut self, frequency_hz: f32, cx: &mut Collaborators<'_>) {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            log::debug!("Ignoring invalid frequency {}", frequency_hz);
            return;
        }
        self.selection.frequency_hz = frequency_hz;
        if self.state == PlaybackState::Playing {
            cx.engine.set_frequency(frequency_hz);
            cx.panel.update_frequency_readout(frequency_hz);
        }
    }

    pub fn change_waveform(&mut self, waveform: WaveformKind, cx: &mut Collaborators<'_>) {
        self.selection.waveform = waveform;
        if self.state == PlaybackState::Playing {
            cx.engine.set_waveform(waveform);
        }
    }

    pub fn change_volume(&mut self, percent: u8, cx: &mut Collaborators<'_>) {
        self.selection.volume_percent = percent.min(100);
        cx.engine.set_volume(volume_fraction(percent));
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }

    /// Next notice to show the user, oldest first
    pub fn take_notification(&mut self) -> Option<String> {
        self.notifications.pop_front()
    }

    fn stream_fault(&mut self, reason: &str, cx: &mut Collaborators<'_>) {
        log::error!("Audio stream fault: {}", reason);
        if self.state == PlaybackState::Playing {
            self.stop(cx);
            self.notify(STREAM_FAULT_NOTICE);
        }
    }

    /// Flips the sync indicator to "synchronizing" and back after a delay.
    /// Purely cosmetic; audio is already playing.
    fn simulate_sync(&mut self, cx: &mut Collaborators<'_>) {
        cx.panel.update_sync_indicator(false);
        if let Some(handle) = self.sync_task.take() {
            cx.scheduler.cancel(handle);
        }
        self.sync_task = Some(cx.scheduler.after(cx.now, self.sync_delay, Tick::SyncConnected));
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push_back(message.to_string());
    }
}
