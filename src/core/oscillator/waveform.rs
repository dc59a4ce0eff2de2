use serde::{Serialize, Deserialize};
use std::f32::consts::PI;
use std::fmt;

/// Periodic shape of the tone source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 4] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Sawtooth,
        WaveformKind::Triangle,
    ];

    /// Amplitude in [-1, 1] at `phase`, where one period spans [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            WaveformKind::Sine => (2.0 * PI * phase).sin(),
            WaveformKind::Square => if phase < 0.5 { 1.0 } else { -1.0 },
            WaveformKind::Sawtooth => 2.0 * phase - 1.0,
            WaveformKind::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaveformKind::Sine => "Sine",
            WaveformKind::Square => "Square",
            WaveformKind::Sawtooth => "Sawtooth",
            WaveformKind::Triangle => "Triangle",
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WaveformKind::Sine => "sine",
            WaveformKind::Square => "square",
            WaveformKind::Sawtooth => "sawtooth",
            WaveformKind::Triangle => "triangle",
        })
    }
}
