use egui::{Ui, Color32};
use egui_plot::{Plot, Line, PlotPoints};

/// Static plot of one period of a waveform
pub struct WaveformPlot {
    points: Vec<[f32; 2]>,
    height: f32,
    color: Color32,
}

impl WaveformPlot {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self {
            points,
            height: 60.0,
            color: Color32::from_rgb(0x00, 0xd4, 0xff),
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui, id_source: impl std::hash::Hash) {
        let plot = Plot::new(id_source)
            .height(self.height)
            .show_x(false)
            .show_y(false)
            .show_axes(false)
            .include_y(-1.1)
            .include_y(1.1)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false);

        plot.show(ui, |plot_ui| {
            let plot_points = PlotPoints::from_iter(
                self.points.iter().map(|[x, y]| [*x as f64, *y as f64])
            );
            plot_ui.line(Line::new(plot_points).color(self.color));
        });
    }
}
