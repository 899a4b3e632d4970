// lib.rs

pub mod app_ui;
pub mod asset;
pub mod axes_util;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gpu_backend;
pub mod layout;
pub mod logging;
pub mod monitor_gui;
pub mod refresh;
pub mod scene;
pub mod settings;
pub mod tape;
