// settings.rs
use eframe::egui::Color32;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x2d, 0x2d, 0x2d);
/// Line colors, cycled per asset: light blue, gold, light green.
pub const SERIES_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x87, 0xce, 0xeb),
    Color32::from_rgb(0xff, 0xd7, 0x00),
    Color32::from_rgb(0x98, 0xfb, 0x98),
];
pub const AXIS_COLOR: Color32 = Color32::GRAY;
pub const LABEL_COLOR: Color32 = Color32::LIGHT_GRAY;
pub const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 60, 120);
pub const WATERMARK_COLOR: Color32 = Color32::from_rgba_premultiplied(20, 20, 20, 38);
pub const TAPE_BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);

pub const TITLE_FONT_SIZE: f32 = 20.0;
pub const CHART_TITLE_FONT_SIZE: f32 = 16.0;
pub const CLOCK_FONT_SIZE: f32 = 12.0;
pub const VALUE_LABEL_FONT_SIZE: f32 = 11.0;
pub const AXIS_FONT_SIZE: f32 = 10.0;
pub const WATERMARK_FONT_SIZE: f32 = 40.0;
pub const TAPE_FONT_SIZE: f32 = 14.0;

pub const CHART_LEFT_MARGIN: f32 = 80.0; // room for the y axis labels
pub const CHART_RIGHT_MARGIN: f32 = 90.0; // room for the value label
pub const PRICE_TICK_TARGET: usize = 6;
pub const TIME_TICK_TARGET: usize = 8;
pub const GRID_DASH: f32 = 4.0;
pub const GRID_GAP: f32 = 4.0;
pub const LINE_WIDTH: f32 = 1.5;

pub const CLOCK_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";
pub const Y_AXIS_LABEL: &str = "Value / Points";
pub const X_AXIS_LABEL: &str = "Time (UTC)";
pub const STATUS_MESSAGE_MAX_COUNT: usize = 5;
pub const IDLE_REPAINT_SECS: u64 = 1; // clock resolution when the tape is still
