// chart.rs - paints one ChartScene into its slot
use crate::axes_util;
use crate::layout::AxisBounds;
use crate::scene::ChartScene;
use crate::settings::*;
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

const TITLE_HEIGHT: f32 = 24.0;
const TIME_LABEL_HEIGHT: f32 = 18.0;

pub fn create_scale_price_fn(bounds: AxisBounds, rect: Rect) -> impl Fn(f64) -> f32 {
    let range = bounds.span().max(1e-9);
    let height = rect.height();
    let bottom = rect.bottom();
    let lower = bounds.lower;

    move |price: f64| -> f32 { bottom - ((price - lower) / range) as f32 * height }
}

pub fn create_scale_time_fn(time_range: (i64, i64), rect: Rect) -> impl Fn(i64) -> f32 {
    let (start, end) = time_range;
    let span = (end - start).max(1) as f64;
    let left = rect.left();
    let width = rect.width();

    move |time: i64| -> f32 { left + ((time - start) as f64 / span) as f32 * width }
}

/// Area left for the series once the title, axis labels and value label
/// margins are taken out of the slot.
pub fn plot_rect(slot: Rect) -> Rect {
    Rect::from_min_max(
        egui::pos2(slot.left() + CHART_LEFT_MARGIN, slot.top() + TITLE_HEIGHT),
        egui::pos2(
            (slot.right() - CHART_RIGHT_MARGIN).max(slot.left() + CHART_LEFT_MARGIN + 1.0),
            (slot.bottom() - TIME_LABEL_HEIGHT).max(slot.top() + TITLE_HEIGHT + 1.0),
        ),
    )
}

pub fn draw(
    painter: &Painter,
    slot: Rect,
    chart: &ChartScene,
    color: Color32,
    time_range: Option<(i64, i64)>,
    show_time_axis: bool,
) {
    let painter = painter.with_clip_rect(slot);
    let plot = plot_rect(slot);

    painter.text(
        egui::pos2(slot.center().x, slot.top() + 2.0),
        Align2::CENTER_TOP,
        &chart.title,
        FontId::proportional(CHART_TITLE_FONT_SIZE),
        Color32::WHITE,
    );
    painter.text(
        egui::pos2(slot.left() + 4.0, slot.top() + 4.0),
        Align2::LEFT_TOP,
        Y_AXIS_LABEL,
        FontId::proportional(AXIS_FONT_SIZE),
        LABEL_COLOR,
    );
    painter.text(
        plot.center(),
        Align2::CENTER_CENTER,
        &chart.title,
        FontId::proportional(WATERMARK_FONT_SIZE),
        WATERMARK_COLOR,
    );

    let (Some(bounds), Some(time_range)) = (chart.bounds, time_range) else {
        painter.text(
            plot.center() + egui::vec2(0.0, WATERMARK_FONT_SIZE),
            Align2::CENTER_CENTER,
            "waiting for data",
            FontId::proportional(AXIS_FONT_SIZE),
            LABEL_COLOR,
        );
        draw_spines(&painter, plot);
        return;
    };

    let scale_price = create_scale_price_fn(bounds, plot);
    let scale_time = create_scale_time_fn(time_range, plot);

    draw_grid(&painter, plot, bounds, time_range, &scale_price, &scale_time, show_time_axis);
    draw_spines(&painter, plot);

    let points: Vec<Pos2> = chart
        .samples
        .iter()
        .map(|s| egui::pos2(scale_time(s.time), scale_price(s.price)))
        .collect();
    if points.len() > 1 {
        painter.add(Shape::line(points, Stroke::new(LINE_WIDTH, color)));
    } else if let Some(&p) = points.first() {
        painter.circle_filled(p, LINE_WIDTH * 1.5, color);
    }

    if let Some(label) = &chart.label {
        let anchor = egui::pos2(scale_time(label.time), scale_price(label.price));
        painter.circle_filled(anchor, 3.0, color);
        painter.text(
            anchor + egui::vec2(6.0, 0.0),
            Align2::LEFT_CENTER,
            &label.text,
            FontId::proportional(VALUE_LABEL_FONT_SIZE),
            color,
        );
        draw_legend(&painter, plot, &format!("Value: {}", label.text), color);
    }
}

fn draw_grid(
    painter: &Painter,
    plot: Rect,
    bounds: AxisBounds,
    time_range: (i64, i64),
    scale_price: &impl Fn(f64) -> f32,
    scale_time: &impl Fn(i64) -> f32,
    show_time_axis: bool,
) {
    let stroke = Stroke::new(0.5, GRID_COLOR);
    let font = FontId::proportional(AXIS_FONT_SIZE);

    for (price, text) in axes_util::price_ticks(bounds, PRICE_TICK_TARGET) {
        let y = scale_price(price);
        painter.extend(Shape::dashed_line(
            &[egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            stroke,
            GRID_DASH,
            GRID_GAP,
        ));
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            text,
            font.clone(),
            LABEL_COLOR,
        );
    }

    let (start, end) = time_range;
    let spans_days = end - start > 86_400_000;
    for time in axes_util::time_ticks(start, end, TIME_TICK_TARGET) {
        let x = scale_time(time);
        painter.extend(Shape::dashed_line(
            &[egui::pos2(x, plot.top()), egui::pos2(x, plot.bottom())],
            stroke,
            GRID_DASH,
            GRID_GAP,
        ));
        if show_time_axis {
            painter.text(
                egui::pos2(x, plot.bottom() + 3.0),
                Align2::CENTER_TOP,
                axes_util::format_time_label(time, spans_days),
                font.clone(),
                LABEL_COLOR,
            );
        }
    }
}

fn draw_spines(painter: &Painter, plot: Rect) {
    let stroke = Stroke::new(1.0, AXIS_COLOR);
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], stroke);
    painter.line_segment([plot.left_bottom(), plot.left_top()], stroke);
}

fn draw_legend(painter: &Painter, plot: Rect, text: &str, color: Color32) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(VALUE_LABEL_FONT_SIZE),
        Color32::WHITE,
    );
    let swatch = 14.0;
    let min = plot.left_top() + egui::vec2(8.0, 8.0);
    let size = galley.size() + egui::vec2(swatch + 16.0, 8.0);
    let frame = Rect::from_min_size(min, size);

    painter.rect_filled(frame, 2.0, Color32::BLACK);
    painter.add(Shape::closed_line(
        vec![
            frame.left_top(),
            frame.right_top(),
            frame.right_bottom(),
            frame.left_bottom(),
        ],
        Stroke::new(1.0, Color32::WHITE),
    ));
    let y = frame.center().y;
    painter.line_segment(
        [egui::pos2(min.x + 4.0, y), egui::pos2(min.x + 4.0 + swatch, y)],
        Stroke::new(LINE_WIDTH, color),
    );
    painter.galley(
        egui::pos2(min.x + swatch + 10.0, min.y + 4.0),
        galley,
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(200.0, 100.0))
    }

    #[test]
    fn price_scale_maps_bounds_to_edges() {
        let scale = create_scale_price_fn(AxisBounds { lower: 90.0, upper: 110.0 }, rect());
        assert_eq!(scale(90.0), 100.0);
        assert_eq!(scale(110.0), 0.0);
        assert_eq!(scale(100.0), 50.0);
    }

    #[test]
    fn time_scale_maps_range_to_width() {
        let scale = create_scale_time_fn((1_000, 3_000), rect());
        assert_eq!(scale(1_000), 0.0);
        assert_eq!(scale(2_000), 100.0);
        assert_eq!(scale(3_000), 200.0);
        // single-sample range does not divide by zero
        let flat = create_scale_time_fn((5, 5), rect());
        assert_eq!(flat(5), 0.0);
    }

    #[test]
    fn plot_rect_fits_in_slot() {
        let slot = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(800.0, 300.0));
        let plot = plot_rect(slot);
        assert!(slot.contains_rect(plot));
        assert!(plot.width() > 0.0 && plot.height() > 0.0);
    }
}
