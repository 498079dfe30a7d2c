//! Yield Curve Charts - interactive gallery of every chart variant
//!
//! Shows the sample market's charts and lets the shock scenario be changed live.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yieldcurve_charts::config::{AppConfig, CONFIG_ENV};
use yieldcurve_charts::gui::{native_options, YieldChartsApp};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref());
    info!(title = %config.viewer.title, "starting chart gallery");
    let render = config.render.clone();

    eframe::run_native(
        &config.viewer.title,
        native_options(&config.viewer),
        Box::new(move |cc| Ok(Box::new(YieldChartsApp::new(cc, render)))),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
    .context("chart gallery window failed")
}
