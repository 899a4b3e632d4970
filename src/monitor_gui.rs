use crate::config::MonitorConfig;
use crate::fetch::MarketData;
use crate::refresh::{RefreshLoop, TickReport};
use crate::scene::Scene;
use crate::settings::STATUS_MESSAGE_MAX_COUNT;
use chrono::Local;
use eframe::egui;
use std::sync::Arc;

pub struct MonitorGui {
    pub title: String,
    pub refresh: RefreshLoop<Scene>,
    pub status_messages: Vec<String>,
    pub tape_moving: bool,
    /// Set once the render surface failed; nothing is polled afterwards.
    pub halted: bool,
}

impl MonitorGui {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &MonitorConfig,
        fetcher: Arc<dyn MarketData>,
    ) -> Self {
        tracing::info!(title = %config.title, "creating monitor window");
        // dark theme
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let scene = Scene::new(config.assets.iter().map(|t| t.name.as_str()));
        Self {
            title: config.title.clone(),
            refresh: RefreshLoop::new(config, fetcher, scene),
            status_messages: Vec::new(),
            tape_moving: config.tape_speed > 0.0,
            halted: false,
        }
    }

    pub fn message_add(&mut self, new_message: String) {
        self.status_messages.push(new_message);
        if self.status_messages.len() > STATUS_MESSAGE_MAX_COUNT {
            self.status_messages.remove(0);
        }
    }

    pub fn record(&mut self, report: TickReport) {
        let now = Local::now().format("%H:%M:%S");
        self.message_add(format!(
            "[{}] updated {}/{}",
            now,
            report.updated.len(),
            report.updated.len() + report.skipped.len()
        ));
        for failure in report.failures {
            self.message_add(format!("[{}] {}", now, failure));
        }
    }
}
