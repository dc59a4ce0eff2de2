mod waveform;

pub use self::waveform::WaveformKind;

use crate::core::engine::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    Running,
    Ended,
}

/// Phase-accumulating tone source
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: WaveformKind,
    frequency: f32,
    sample_rate: f32,
    phase: f32,
    state: SourceState,
}

impl Oscillator {
    pub fn new(waveform: WaveformKind, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            frequency,
            sample_rate,
            phase: 0.0,
            state: SourceState::Running,
        }
    }

    #[cfg(test)]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn is_running(&self) -> bool {
        self.state == SourceState::Running
    }

    /// Next output sample; silence once the source has ended
    pub fn next_sample(&mut self) -> f32 {
        if !self.is_running() {
            return 0.0;
        }

        let value = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.frequency / self.sample_rate).fract();
        value
    }

    /// Ends the source. A source can only be stopped once.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        match self.state {
            SourceState::Running => {
                self.state = SourceState::Ended;
                Ok(())
            },
            SourceState::Ended => Err(EngineError::AlreadyStopped),
        }
    }
}
