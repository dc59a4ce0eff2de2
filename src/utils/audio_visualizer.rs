// Audio Analysis / Visualization

use egui::{Pos2, Vec2};

use crate::core::analyzer::WaveformSample;
use crate::core::oscillator::WaveformKind;

/// One period of `waveform` as plot points, x in [0, 1)
pub fn generate_waveform_preview(waveform: WaveformKind, samples: usize) -> Vec<[f32; 2]> {
    (0..samples)
        .map(|i| {
            let phase = i as f32 / samples as f32;
            [phase, waveform.sample(phase)]
        })
        .collect()
}

/// Oscilloscope trace for `sample` on a surface of `size`.
///
/// Point `i` sits at x = i * (width / len) and y = height / 2 * (1 + deviation),
/// one point per reading in sample order. A final point anchors the trace at
/// the right edge, vertical center.
pub fn trace_points(sample: &WaveformSample, size: Vec2) -> Vec<Pos2> {
    let len = sample.len();
    let mut points = Vec::with_capacity(len + 1);
    if len == 0 {
        return points;
    }

    let slice_width = size.x / len as f32;
    let half_height = size.y / 2.0;
    for i in 0..len {
        let x = i as f32 * slice_width;
        let y = half_height * (1.0 + sample.deviation(i));
        points.push(Pos2::new(x, y));
    }
    points.push(Pos2::new(size.x, half_height));
    points
}
