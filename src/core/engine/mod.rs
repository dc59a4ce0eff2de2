//! Tone engine: owns the audio graph and the output stream feeding it

mod error;
mod graph;
mod host;
#[cfg(test)]
pub(crate) mod testing;

pub use self::error::EngineError;
pub use self::graph::{SharedGraph, ToneGraph};
pub use self::host::{AudioHost, CpalHost, OutputStream, StreamSpec, StreamState};

use std::sync::RwLockWriteGuard;

use crate::core::analyzer::{WaveformSample, DEFAULT_FFT_SIZE};
use crate::core::oscillator::{Oscillator, WaveformKind};

/// Observable engine state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneState {
    pub is_playing: bool,
    pub frequency_hz: f32,
    pub volume: f32,
    pub waveform: WaveformKind,
}

/// Construction-time engine parameters
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub fft_size: usize,
    pub frequency_hz: f32,
    pub volume: f32,
    pub waveform: WaveformKind,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            frequency_hz: 963.0,
            volume: 0.3,
            waveform: WaveformKind::Sine,
        }
    }
}

pub struct ToneEngine {
    host: Box<dyn AudioHost>,
    fft_size: usize,
    graph: Option<SharedGraph>,
    stream: Option<Box<dyn OutputStream>>,
    state: ToneState,
}

impl ToneEngine {
    pub fn new(host: Box<dyn AudioHost>, settings: EngineSettings) -> Self {
        Self {
            host,
            fft_size: settings.fft_size,
            graph: None,
            stream: None,
            state: ToneState {
                is_playing: false,
                frequency_hz: settings.frequency_hz,
                volume: settings.volume.clamp(0.0, 1.0),
                waveform: settings.waveform,
            },
        }
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_supported()
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Starts a tone, replacing any tone already playing. On error nothing
    /// about the current state changes.
    pub fn start(&mut self, frequency_hz: f32, waveform: WaveformKind) -> Result<(), EngineError> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(EngineError::InvalidFrequency(frequency_hz));
        }

        self.initialize()?;

        if let Some(stream) = self.stream.as_mut() {
            if stream.state() == StreamState::Suspended {
                log::debug!("Resuming suspended audio output");
                stream.resume()?;
            }
        }

        if self.state.is_playing {
            self.release_source();
        }

        let mut graph = lock_graph(&self.graph)?;
        let source = Oscillator::new(waveform, frequency_hz, graph.sample_rate());
        graph.connect_source(source);
        drop(graph);

        self.state.is_playing = true;
        self.state.frequency_hz = frequency_hz;
        self.state.waveform = waveform;
        Ok(())
    }

    /// Stops the current tone; a no-op when nothing plays.
    /// A source that ended on its own means the output faulted, so the
    /// graph and stream are dropped and rebuilt by the next `start`.
    pub fn stop(&mut self) {
        let faulted = self.release_source();
        self.state.is_playing = false;

        if faulted {
            log::info!("Discarding faulted audio output");
            self.stream = None;
            self.graph = None;
            return;
        }

        if let Some(stream) = self.stream.as_mut() {
            if stream.state() == StreamState::Running {
                if let Err(e) = stream.suspend() {
                    log::warn!("Could not suspend audio output: {}", e);
                }
            }
        }
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) {
        if !self.state.is_playing || !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return;
        }
        if let Ok(mut graph) = lock_graph(&self.graph) {
            if let Some(source) = graph.source_mut() {
                source.set_frequency(frequency_hz);
                self.state.frequency_hz = frequency_hz;
            }
        }
    }

    pub fn set_waveform(&mut self, waveform: WaveformKind) {
        if !self.state.is_playing {
            return;
        }
        if let Ok(mut graph) = lock_graph(&self.graph) {
            if let Some(source) = graph.source_mut() {
                source.waveform = waveform;
                self.state.waveform = waveform;
            }
        }
    }

    /// Applies in any state; the gain stage picks it up once the graph exists
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;
        if let Ok(mut graph) = lock_graph(&self.graph) {
            graph.set_gain(volume);
        }
    }

    /// Latest analyser snapshot, or `None` before the graph is built
    pub fn waveform_sample(&self) -> Option<WaveformSample> {
        let graph = self.graph.as_ref()?;
        match graph.read() {
            Ok(graph) => Some(graph.time_domain_data()),
            Err(_) => None,
        }
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        if self.graph.is_some() && self.stream.is_some() {
            return Ok(());
        }

        let spec = self.host.output_spec()?;
        let graph = ToneGraph::new(spec.sample_rate, self.state.volume, self.fft_size).shared();
        let stream = self.host.open_stream(&spec, SharedGraph::clone(&graph))?;

        log::info!("Audio graph ready at {} Hz", spec.sample_rate);
        self.graph = Some(graph);
        self.stream = Some(stream);
        Ok(())
    }

    /// Disconnects and stops the source; true when it had already ended
    fn release_source(&mut self) -> bool {
        let Ok(mut graph) = lock_graph(&self.graph) else {
            return false;
        };
        match graph.disconnect_source() {
            Some(mut source) => match source.stop() {
                Ok(()) => false,
                Err(e) => {
                    log::debug!("Ignoring stop of ended source: {}", e);
                    true
                },
            },
            None => false,
        }
    }
}

fn lock_graph(graph: &Option<SharedGraph>) -> Result<RwLockWriteGuard<'_, ToneGraph>, EngineError> {
    match graph.as_ref() {
        Some(graph) => graph.write().map_err(|_| EngineError::GraphPoisoned),
        None => Err(EngineError::ResourceCreation("audio graph not initialized".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeHost;
    use super::*;

    fn engine_with(host: &FakeHost) -> ToneEngine {
        ToneEngine::new(Box::new(host.clone()), EngineSettings::default())
    }

    #[test]
    fn every_waveform_starts_and_yields_a_sample() {
        for kind in WaveformKind::ALL {
            let host = FakeHost::new();
            let mut engine = engine_with(&host);
            engine.start(440.0, kind).unwrap();
            host.pull(4096);

            assert!(engine.is_playing());
            assert_eq!(engine.state().waveform, kind);
            let sample = engine.waveform_sample().unwrap();
            assert!(!sample.is_empty());
            assert!(sample.values().iter().any(|v| *v != 0.0), "{kind} produced silence");
        }
    }

    #[test]
    fn no_sample_before_first_start() {
        let host = FakeHost::new();
        let engine = engine_with(&host);
        assert!(engine.waveform_sample().is_none());
    }

    #[test]
    fn graph_is_built_once() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();
        engine.start(528.0, WaveformKind::Square).unwrap();
        engine.stop();
        engine.start(396.0, WaveformKind::Sine).unwrap();

        assert_eq!(host.log.borrow().streams_opened, 1);
        assert_eq!(engine.state().frequency_hz, 396.0);
    }

    #[test]
    fn suspended_output_is_resumed_on_start() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();
        assert_eq!(host.log.borrow().state, Some(StreamState::Running));

        engine.stop();
        assert_eq!(host.log.borrow().state, Some(StreamState::Suspended));
        assert_eq!(host.log.borrow().suspends, 1);

        engine.start(440.0, WaveformKind::Sine).unwrap();
        assert_eq!(host.log.borrow().resumes, 2);
    }

    #[test]
    fn double_stop_is_harmless() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();

        engine.stop();
        assert!(!engine.is_playing());
        engine.stop();
        assert!(!engine.is_playing());
    }

    #[test]
    fn stop_before_start_is_a_no_op() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.stop();
        assert!(!engine.is_playing());
        assert_eq!(host.log.borrow().streams_opened, 0);
    }

    #[test]
    fn stop_tolerates_a_source_that_already_ended() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();
        host.log.borrow().graph.as_ref().unwrap().write().unwrap().terminate_source();

        engine.stop();
        assert!(!engine.is_playing());
    }

    #[test]
    fn start_after_output_fault_rebuilds_the_stream() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();
        host.log.borrow().graph.as_ref().unwrap().write().unwrap().terminate_source();
        engine.stop();
        assert!(engine.waveform_sample().is_none());

        engine.start(528.0, WaveformKind::Sine).unwrap();
        host.pull(4096);

        assert_eq!(host.log.borrow().streams_opened, 2);
        assert_eq!(host.log.borrow().state, Some(StreamState::Running));
        let sample = engine.waveform_sample().unwrap();
        assert!(sample.values().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn volume_applies_in_any_state() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.set_volume(0.8);
        assert_eq!(engine.state().volume, 0.8);

        engine.start(440.0, WaveformKind::Sine).unwrap();
        let gain = host.log.borrow().graph.as_ref().unwrap().read().unwrap().gain();
        assert_eq!(gain, 0.8);

        engine.set_volume(1.5);
        assert_eq!(engine.state().volume, 1.0);
    }

    #[test]
    fn frequency_and_waveform_ignored_while_stopped() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        let before = engine.state();

        engine.set_frequency(100.0);
        engine.set_waveform(WaveformKind::Triangle);
        assert_eq!(engine.state(), before);

        engine.start(440.0, WaveformKind::Sine).unwrap();
        engine.stop();
        let stopped = engine.state();
        engine.set_frequency(100.0);
        engine.set_waveform(WaveformKind::Triangle);
        assert_eq!(engine.state(), stopped);
    }

    #[test]
    fn live_changes_reach_the_source() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        engine.start(440.0, WaveformKind::Sine).unwrap();
        engine.set_frequency(528.0);
        engine.set_waveform(WaveformKind::Sawtooth);

        let log = host.log.borrow();
        let graph = log.graph.as_ref().unwrap().read().unwrap();
        let source = graph.source().unwrap();
        assert_eq!(source.frequency(), 528.0);
        assert_eq!(source.waveform, WaveformKind::Sawtooth);
        assert_eq!(engine.state().frequency_hz, 528.0);
    }

    #[test]
    fn unsupported_host_reports_failure() {
        let host = FakeHost::unsupported();
        let mut engine = engine_with(&host);
        assert!(!engine.is_supported());
        assert_eq!(engine.start(440.0, WaveformKind::Sine), Err(EngineError::Unsupported));
        assert!(!engine.is_playing());
    }

    #[test]
    fn failed_resource_creation_leaves_engine_stopped() {
        let mut host = FakeHost::new();
        host.fail_open = true;
        let mut engine = engine_with(&host);
        let err = engine.start(440.0, WaveformKind::Sine).unwrap_err();
        assert!(matches!(err, EngineError::ResourceCreation(_)));
        assert!(!engine.is_playing());
        assert!(engine.waveform_sample().is_none());
    }

    #[test]
    fn failed_resume_leaves_engine_stopped() {
        let mut host = FakeHost::new();
        host.fail_resume = true;
        let mut engine = engine_with(&host);
        assert!(matches!(engine.start(440.0, WaveformKind::Sine), Err(EngineError::Resume(_))));
        assert!(!engine.is_playing());
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let host = FakeHost::new();
        let mut engine = engine_with(&host);
        assert_eq!(engine.start(0.0, WaveformKind::Sine), Err(EngineError::InvalidFrequency(0.0)));
        assert!(!engine.is_playing());
    }
}
