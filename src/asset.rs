// asset.rs
use crate::config::Ticker;
use crate::fetch::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn symbol(self) -> char {
        match self {
            Direction::Up => '▲',
            Direction::Down => '▼',
            Direction::Flat => '■',
        }
    }
}

/// Latest price summary for the ticker tape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub last: f64,
    pub open: f64,
    pub direction: Direction,
    pub change_percent: f64,
}

/// Per-ticker session record. `min`/`max` only widen.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetState {
    pub ticker: Ticker,
    pub samples: Vec<Sample>,
    pub last_price: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AssetState {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            samples: Vec::new(),
            last_price: None,
            min: None,
            max: None,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Replaces the series with a full-session fetch. Returns `false` and
    /// leaves the state untouched when `samples` is empty.
    pub fn update(&mut self, samples: Vec<Sample>) -> bool {
        let Some(last) = samples.last() else {
            return false;
        };
        self.last_price = Some(last.price);

        let (lo, hi) = samples
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), s| (lo.min(s.price), hi.max(s.price)));
        self.min = Some(self.min.map_or(lo, |m| m.min(lo)));
        self.max = Some(self.max.map_or(hi, |m| m.max(hi)));

        self.samples = samples;
        true
    }

    /// Observed `(min, max)` for the session, if any sample was seen.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    pub fn quote(&self) -> Option<Quote> {
        let last = self.last_price?;
        let open = self.samples.first()?.price;
        let change = last - open;
        let direction = if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        };
        let change_percent = if open != 0.0 { change / open * 100.0 } else { 0.0 };
        Some(Quote {
            last,
            open,
            direction,
            change_percent,
        })
    }
}
