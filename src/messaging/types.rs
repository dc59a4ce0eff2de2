use crate::core::oscillator::WaveformKind;

/// Messages from the widgets and the audio thread to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    Start,
    Stop,
    SetFrequency(f32),
    SetWaveform(WaveformKind),
    SetVolume(u8), // percent, 0..=100
    StreamFault(String),
}
