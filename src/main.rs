use market_pulse::config::MonitorConfig;
use market_pulse::error::MonitorError;
use market_pulse::fetch::{MarketData, YahooClient};
use market_pulse::gpu_backend;
use market_pulse::logging;
use market_pulse::monitor_gui::MonitorGui;
use std::sync::Arc;

fn setup() -> Result<(MonitorConfig, Arc<dyn MarketData>), MonitorError> {
    let config = MonitorConfig::from_env()?;
    let client = YahooClient::new(config.request_timeout())?;
    Ok((config, Arc::new(client)))
}

fn main() -> eframe::Result<()> {
    logging::init();
    let (config, fetcher) = setup().map_err(|e| {
        tracing::error!(error = %e, "startup failed");
        e
    })?;
    tracing::info!(
        assets = config.assets.len(),
        refresh_secs = config.refresh_interval_secs,
        period = %config.lookback_period,
        "starting monitor"
    );

    let title = config.title.clone();
    eframe::run_native(
        &title,
        gpu_backend::native_options(&title, config.assets.len()),
        Box::new(move |cc| Ok(Box::new(MonitorGui::new(cc, &config, fetcher)))),
    )
}
