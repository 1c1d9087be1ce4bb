use egui::{Align2, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};

use crate::render::scene::{Axis, AxisSide, DataRect, DrawCommand};
use crate::state::theme::Theme;

/// Maps data coordinates into a screen rectangle (y grows upward in data
/// space, downward on screen).
#[derive(Debug, Clone, Copy)]
pub struct PlotTransform {
    pub bounds: DataRect,
    pub rect: Rect,
}

impl PlotTransform {
    pub fn new(bounds: DataRect, rect: Rect) -> Self {
        Self { bounds, rect }
    }

    /// Same as `new`, with `pad` (a fraction of each span) added around the
    /// bounds. Zero-height bounds are widened so flat curves stay visible.
    pub fn padded(bounds: DataRect, rect: Rect, pad: f64) -> Self {
        let x_pad = bounds.width() * pad;
        let y_pad = if bounds.height().abs() < 1e-12 {
            0.5
        } else {
            bounds.height() * pad
        };
        Self::new(
            DataRect::new(
                [bounds.min[0] - x_pad, bounds.min[1] - y_pad],
                [bounds.max[0] + x_pad, bounds.max[1] + y_pad],
            ),
            rect,
        )
    }

    pub fn data_to_screen(&self, x: f64, y: f64) -> Pos2 {
        let w = self.bounds.width().max(1e-15);
        let h = self.bounds.height().max(1e-15);
        let tx = (x - self.bounds.min[0]) / w;
        let ty = (y - self.bounds.min[1]) / h;
        Pos2::new(
            self.rect.left() + tx as f32 * self.rect.width(),
            self.rect.bottom() - ty as f32 * self.rect.height(),
        )
    }

    pub fn screen_to_data(&self, pos: Pos2) -> (f64, f64) {
        let tx = ((pos.x - self.rect.left()) / self.rect.width().max(1.0)) as f64;
        let ty = ((self.rect.bottom() - pos.y) / self.rect.height().max(1.0)) as f64;
        (
            self.bounds.min[0] + tx * self.bounds.width(),
            self.bounds.min[1] + ty * self.bounds.height(),
        )
    }

    pub fn screen_rect(&self, r: &DataRect) -> Rect {
        Rect::from_two_pos(
            self.data_to_screen(r.min[0], r.min[1]),
            self.data_to_screen(r.max[0], r.max[1]),
        )
    }
}

/// Execute draw commands inside `transform.rect`.
pub fn paint(painter: &egui::Painter, commands: &[DrawCommand], transform: &PlotTransform, theme: &Theme) {
    painter.rect_filled(transform.rect, 0.0, theme.plot_bg());

    for command in commands {
        match command {
            DrawCommand::Rect { rect, fill } => {
                // Expand by a fraction of a pixel so neighbouring cells do not leave seams.
                let r = transform.screen_rect(rect).expand(0.25);
                painter.rect_filled(r, 0.0, *fill);
            }
            DrawCommand::Path { points, style } => {
                let screen: Vec<Pos2> = points
                    .iter()
                    .filter(|p| p[0].is_finite() && p[1].is_finite())
                    .map(|p| transform.data_to_screen(p[0], p[1]))
                    .collect();
                if screen.len() >= 2 {
                    painter.add(Shape::line(screen, theme.path_stroke(*style)));
                }
            }
            DrawCommand::Axis(axis) => paint_axis(painter, axis, transform),
            DrawCommand::Notice { text, kind } => {
                painter.text(
                    transform.rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(15.0),
                    theme.notice_color(*kind),
                );
            }
        }
    }

    let border = painter.ctx().style().visuals.text_color().gamma_multiply(0.6);
    painter.rect_stroke(transform.rect, 0.0, Stroke::new(1.0, border), StrokeKind::Outside);
}

fn paint_axis(painter: &egui::Painter, axis: &Axis, transform: &PlotTransform) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.6);
    let rect = transform.rect;
    let font = FontId::proportional(10.0);

    match axis.side {
        AxisSide::Bottom => {
            for tick in &axis.ticks {
                let x = transform.data_to_screen(tick.position, transform.bounds.min[1]).x;
                painter.vline(x, rect.bottom()..=(rect.bottom() + 4.0), Stroke::new(1.0, dim_color));
                painter.text(
                    Pos2::new(x, rect.bottom() + 6.0),
                    Align2::CENTER_TOP,
                    &tick.label,
                    font.clone(),
                    dim_color,
                );
            }
            painter.text(
                Pos2::new(rect.center().x, rect.bottom() + 22.0),
                Align2::CENTER_TOP,
                &axis.title,
                FontId::proportional(12.0),
                text_color,
            );
        }
        AxisSide::Left => {
            for tick in &axis.ticks {
                let y = transform.data_to_screen(transform.bounds.min[0], tick.position).y;
                painter.hline((rect.left() - 4.0)..=rect.left(), y, Stroke::new(1.0, dim_color));
                painter.text(
                    Pos2::new(rect.left() - 6.0, y),
                    Align2::RIGHT_CENTER,
                    &tick.label,
                    font.clone(),
                    dim_color,
                );
            }
            painter.text(
                Pos2::new(rect.left() - 44.0, rect.center().y),
                Align2::CENTER_CENTER,
                &axis.title,
                FontId::proportional(12.0),
                text_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_round_trips_points() {
        let rect = Rect::from_min_max(Pos2::new(100.0, 50.0), Pos2::new(300.0, 250.0));
        let t = PlotTransform::new(DataRect::unit(), rect);

        assert_eq!(t.data_to_screen(0.0, 0.0), Pos2::new(100.0, 250.0));
        assert_eq!(t.data_to_screen(1.0, 1.0), Pos2::new(300.0, 50.0));

        let (x, y) = t.screen_to_data(Pos2::new(150.0, 200.0));
        assert!((x - 0.25).abs() < 1e-6);
        assert!((y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn screen_rect_is_normalized() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 100.0));
        let t = PlotTransform::new(DataRect::unit(), rect);
        let r = t.screen_rect(&DataRect::new([0.0, 0.0], [0.5, 0.5]));
        assert_eq!(r.min, Pos2::new(0.0, 50.0));
        assert_eq!(r.max, Pos2::new(50.0, 100.0));
    }

    #[test]
    fn padding_widens_flat_bounds() {
        let rect = Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0));
        let t = PlotTransform::padded(DataRect::new([0.0, 1.0], [1.0, 1.0]), rect, 0.1);
        assert_eq!(t.bounds.min[1], 0.5);
        assert_eq!(t.bounds.max[1], 1.5);
        assert!((t.bounds.min[0] + 0.1).abs() < 1e-12);
    }
}
