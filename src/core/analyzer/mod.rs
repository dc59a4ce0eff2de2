use std::collections::VecDeque;

pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Snapshot of recent output amplitude, centered on [`WaveformSample::CENTER`]
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSample {
    values: Vec<f32>,
}

impl WaveformSample {
    pub const CENTER: f32 = 0.0;

    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Signed distance of reading `index` from the center value
    pub fn deviation(&self, index: usize) -> f32 {
        self.values[index] - Self::CENTER
    }
}

/// Time-domain analyser: keeps the last `fft_size` samples that passed through it
pub struct Analyser {
    fft_size: usize,
    history: VecDeque<f32>,
}

impl Analyser {
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        Self {
            fft_size,
            history: VecDeque::with_capacity(fft_size),
        }
    }

    /// Length of every snapshot handed out
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn push(&mut self, sample: f32) {
        if self.history.len() == self.fft_size {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    /// Most recent `frequency_bin_count` samples, oldest first. Silence
    /// (the center value) pads the front until enough audio has flowed.
    pub fn time_domain_data(&self) -> WaveformSample {
        let count = self.frequency_bin_count();
        let available = self.history.len().min(count);
        let mut values = vec![WaveformSample::CENTER; count - available];
        values.extend(self.history.iter().skip(self.history.len() - available).copied());
        WaveformSample::new(values)
    }
}
