// tape.rs - scrolling price summary along the bottom of the window
use crate::asset::Quote;
use crate::axes_util::format_value;

pub const PLACEHOLDER: &str = "--";
pub const SEPARATOR: &str = "   |   ";
/// Wrap period used until the rendered width is known.
pub const DEFAULT_WRAP: f32 = 4096.0;

#[derive(Debug, Clone)]
pub struct TickerTape {
    fragments: Vec<String>,
    offset: f32,
    speed: f32,
    wrap_width: f32,
}

impl TickerTape {
    pub fn new(speed: f32) -> Self {
        Self {
            fragments: Vec::new(),
            offset: 0.0,
            speed,
            wrap_width: DEFAULT_WRAP,
        }
    }

    /// Rebuilds one fragment per asset, in the order given. `None` renders
    /// the placeholder for that asset only.
    pub fn advance<'a, I>(&mut self, quotes: I)
    where
        I: IntoIterator<Item = (&'a str, Option<Quote>)>,
    {
        self.fragments = quotes
            .into_iter()
            .map(|(name, quote)| match quote {
                Some(q) => format!(
                    "{} {} {} {:+.2}%",
                    name,
                    format_value(q.last),
                    q.direction.symbol(),
                    q.change_percent
                ),
                None => format!("{} {}", name, PLACEHOLDER),
            })
            .collect();
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn text(&self) -> String {
        self.fragments.join(SEPARATOR)
    }

    /// Width of one rendered copy of the tape text; the offset wraps at it.
    pub fn set_wrap_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.wrap_width = width;
            self.offset = self.offset.rem_euclid(width);
        }
    }

    /// Moves the tape left by `speed * dt` pixels. The offset stays below the
    /// wrap width so per-frame steps never fall under float resolution.
    pub fn scroll(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.offset = (self.offset + self.speed * dt).rem_euclid(self.wrap_width);
        }
    }

    /// Scroll offset wrapped into `[0, width)` for a rendered text width.
    pub fn offset_within(&self, width: f32) -> f32 {
        if width > 0.0 {
            self.offset.rem_euclid(width)
        } else {
            0.0
        }
    }
}
