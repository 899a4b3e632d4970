// app_ui.rs
use crate::chart;
use crate::monitor_gui::MonitorGui;
use crate::settings::*;
use crate::tape::SEPARATOR;
use chrono::Local;
use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect};
use eframe::Frame;
use std::time::{Duration, Instant};

impl eframe::App for MonitorGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.halted {
            return;
        }
        let dt = ctx.input(|i| i.stable_dt);
        let clock = Local::now().format(CLOCK_FORMAT).to_string();
        self.refresh.on_frame(dt, &clock);

        match self.refresh.poll(Instant::now()) {
            Ok(Some(report)) => self.record(report),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "render surface unusable, closing");
                self.halted = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(BACKGROUND))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter_at(rect);
                self.draw_header(&painter, rect);
                self.draw_charts(&painter, rect);
                let tape_width = self.draw_tape(&painter, rect);
                self.refresh.set_tape_width(tape_width);
            });

        if self.tape_moving {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_secs(IDLE_REPAINT_SECS));
        }
    }
}

impl MonitorGui {
    fn draw_header(&self, painter: &Painter, rect: Rect) {
        let scene = self.refresh.surface();
        painter.text(
            egui::pos2(rect.center().x, rect.top() + 6.0),
            Align2::CENTER_TOP,
            &self.title,
            FontId::proportional(TITLE_FONT_SIZE),
            Color32::WHITE,
        );
        painter.text(
            egui::pos2(rect.right() - 12.0, rect.top() + 8.0),
            Align2::RIGHT_TOP,
            &scene.clock,
            FontId::proportional(CLOCK_FONT_SIZE),
            Color32::WHITE,
        );
        if let Some(msg) = self.status_messages.last() {
            painter.text(
                egui::pos2(rect.left() + 12.0, rect.top() + 8.0),
                Align2::LEFT_TOP,
                msg,
                FontId::proportional(AXIS_FONT_SIZE),
                LABEL_COLOR,
            );
        }
    }

    fn draw_charts(&self, painter: &Painter, rect: Rect) {
        let scene = self.refresh.surface();
        let time_range = scene.shared_time_range();
        let grid = self.refresh.grid();
        let last = grid.len().saturating_sub(1);

        for (index, (slot, chart_scene)) in grid.slots().iter().zip(&scene.charts).enumerate() {
            let slot_rect = Rect::from_min_max(
                egui::pos2(rect.left(), rect.top() + slot.top * rect.height()),
                egui::pos2(rect.right(), rect.top() + slot.bottom * rect.height()),
            );
            let color = SERIES_COLORS[index % SERIES_COLORS.len()];
            chart::draw(painter, slot_rect, chart_scene, color, time_range, index == last);
        }

        if let Some(slot) = grid.slot(last) {
            painter.text(
                egui::pos2(rect.center().x, rect.top() + slot.bottom * rect.height() + 2.0),
                Align2::CENTER_TOP,
                X_AXIS_LABEL,
                FontId::proportional(AXIS_FONT_SIZE),
                LABEL_COLOR,
            );
        }
    }

    /// Paints the tape strip and returns the width of one text copy.
    fn draw_tape(&self, painter: &Painter, rect: Rect) -> f32 {
        let tape = self.refresh.tape();
        let height = TAPE_FONT_SIZE + 10.0;
        let strip = Rect::from_min_max(egui::pos2(rect.left(), rect.bottom() - height), rect.max);
        painter.rect_filled(strip, 0.0, TAPE_BACKGROUND);

        let text = format!("{}{}", self.refresh.surface().tape, SEPARATOR);
        let galley = painter.layout_no_wrap(text, FontId::monospace(TAPE_FONT_SIZE), LABEL_COLOR);
        let width = galley.size().x;
        if width <= 0.0 {
            return width;
        }

        let painter = painter.with_clip_rect(strip);
        let y = strip.center().y - galley.size().y / 2.0;
        let mut x = strip.left() - tape.offset_within(width);
        while x < strip.right() {
            painter.galley(egui::pos2(x, y), galley.clone(), LABEL_COLOR);
            x += width;
        }
        width
    }
}
