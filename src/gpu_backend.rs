// src/gpu_backend.rs
use eframe::egui;

/// Window sized for `charts` stacked plots.
pub fn native_options(title: &str, charts: usize) -> eframe::NativeOptions {
    let height = (160.0 + 300.0 * charts as f32).min(1000.0);
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(egui::vec2(1280.0, height))
            .with_min_inner_size(egui::vec2(480.0, 360.0)),
        multisampling: 4,
        depth_buffer: 0,
        stencil_buffer: 0,
        renderer: eframe::Renderer::Wgpu,
        run_and_return: true,
        ..Default::default()
    }
}
