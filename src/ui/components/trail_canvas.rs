use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

/// Traces fainter than this are dropped from the display list
const MIN_VISIBILITY: f32 = 1.0 / 255.0;

struct Trace {
    points: Vec<Pos2>,
    stroke: Stroke,
    visibility: f32,
}

/// Fixed-size drawing surface that remembers what was drawn on it.
///
/// egui repaints from scratch every frame, so the canvas keeps a display
/// list instead of pixels. A translucent fill over the whole surface is
/// modelled by [`TrailCanvas::fade`], which dims every earlier trace; the
/// result is the same fading-trail look a pixel canvas would give.
/// Coordinates are surface-local with the origin at the top-left corner.
pub struct TrailCanvas {
    size: Vec2,
    background: Color32,
    traces: Vec<Trace>,
}

impl TrailCanvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            background: Color32::BLACK,
            traces: Vec::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[cfg(test)]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Points and current visibility of the most recent trace
    #[cfg(test)]
    pub fn latest(&self) -> Option<(&[Pos2], f32)> {
        self.traces.last().map(|t| (t.points.as_slice(), t.visibility))
    }

    /// Covers the whole surface with background at `alpha` opacity
    pub fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for trace in &mut self.traces {
            trace.visibility *= keep;
        }
        self.traces.retain(|t| t.visibility >= MIN_VISIBILITY);
    }

    pub fn clear(&mut self) {
        self.traces.clear();
    }

    pub fn stroke_path(&mut self, points: Vec<Pos2>, stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.traces.push(Trace { points, stroke, visibility: 1.0 });
    }

    /// Paints the surface into `rect`, scaling surface coordinates to fit
    pub fn paint(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 4.0, self.background);

        let scale = Vec2::new(rect.width() / self.size.x, rect.height() / self.size.y);
        for trace in &self.traces {
            let points: Vec<Pos2> = trace.points
                .iter()
                .map(|p| rect.min + Vec2::new(p.x * scale.x, p.y * scale.y))
                .collect();
            let stroke = Stroke::new(trace.stroke.width, trace.stroke.color.gamma_multiply(trace.visibility));
            painter.add(Shape::line(points, stroke));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Pos2> {
        vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0)]
    }

    #[test]
    fn fade_dims_earlier_traces_only() {
        let mut canvas = TrailCanvas::new(Vec2::new(100.0, 50.0));
        canvas.stroke_path(line(), Stroke::new(2.0, Color32::WHITE));
        canvas.fade(0.1);
        canvas.stroke_path(line(), Stroke::new(2.0, Color32::WHITE));

        assert_eq!(canvas.trace_count(), 2);
        assert!((canvas.traces[0].visibility - 0.9).abs() < 1e-6);
        assert_eq!(canvas.latest().unwrap().1, 1.0);
    }

    #[test]
    fn repeated_fades_bound_the_display_list() {
        let mut canvas = TrailCanvas::new(Vec2::new(100.0, 50.0));
        for _ in 0..1000 {
            canvas.fade(0.1);
            canvas.stroke_path(line(), Stroke::new(2.0, Color32::WHITE));
        }
        // 0.9^n drops below 1/255 after 53 fades
        assert!(canvas.trace_count() <= 54);
    }

    #[test]
    fn clear_empties_the_surface() {
        let mut canvas = TrailCanvas::new(Vec2::new(100.0, 50.0));
        canvas.stroke_path(line(), Stroke::new(2.0, Color32::WHITE));
        canvas.clear();
        assert_eq!(canvas.trace_count(), 0);
    }

    #[test]
    fn single_point_paths_are_ignored() {
        let mut canvas = TrailCanvas::new(Vec2::new(100.0, 50.0));
        canvas.stroke_path(vec![Pos2::ZERO], Stroke::new(2.0, Color32::WHITE));
        assert!(canvas.latest().is_none());
    }
}
