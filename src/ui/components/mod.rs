mod trail_canvas;
mod waveform_plot;

pub use trail_canvas::TrailCanvas;
pub use waveform_plot::WaveformPlot;
