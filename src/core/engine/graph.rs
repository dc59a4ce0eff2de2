use std::sync::{Arc, RwLock};

use crate::core::analyzer::{Analyser, WaveformSample};
use crate::core::oscillator::Oscillator;

/// Graph shared between the engine (UI thread) and the output callback
pub type SharedGraph = Arc<RwLock<ToneGraph>>;

/// Fixed signal chain: source -> gain -> analyser -> output
pub struct ToneGraph {
    sample_rate: f32,
    source: Option<Oscillator>,
    gain: f32,
    analyser: Analyser,
}

impl ToneGraph {
    pub fn new(sample_rate: f32, gain: f32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            source: None,
            gain: gain.clamp(0.0, 1.0),
            analyser: Analyser::new(fft_size),
        }
    }

    pub fn shared(self) -> SharedGraph {
        Arc::new(RwLock::new(self))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[cfg(test)]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    pub fn connect_source(&mut self, source: Oscillator) {
        self.source = Some(source);
    }

    pub fn disconnect_source(&mut self) -> Option<Oscillator> {
        self.source.take()
    }

    #[cfg(test)]
    pub fn source(&self) -> Option<&Oscillator> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut Oscillator> {
        self.source.as_mut()
    }

    /// Ends the connected source without disconnecting it, as happens when
    /// the output device goes away underneath a running tone.
    pub fn terminate_source(&mut self) {
        if let Some(source) = self.source.as_mut() {
            // Ending an already ended source changes nothing
            let _ = source.stop();
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let raw = match self.source.as_mut() {
            Some(source) => source.next_sample(),
            None => 0.0,
        };
        let out = raw * self.gain;
        self.analyser.push(out);
        out
    }

    /// Fills a mono buffer
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn time_domain_data(&self) -> WaveformSample {
        self.analyser.time_domain_data()
    }
}
