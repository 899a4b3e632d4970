//! Axis bounds and subplot geometry.
//!
//! Bounds follow a monotonic-widening rule: once a chart's vertical range is
//! set it only grows, and only on the side a new extreme crossed. Repeated
//! redraws with prices inside the range therefore never rescale the axis.

/// Smallest half-span around a flat or zero price, so the axis never collapses.
pub const MIN_HALF_SPAN: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub lower: f64,
    pub upper: f64,
}

impl AxisBounds {
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, price: f64) -> bool {
        self.lower <= price && price <= self.upper
    }

    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper
    }
}

fn pad_down(min: f64, padding: f64) -> f64 {
    min - (padding * min.abs()).max(MIN_HALF_SPAN)
}

fn pad_up(max: f64, padding: f64) -> f64 {
    max + (padding * max.abs()).max(MIN_HALF_SPAN)
}

/// New bounds for an observed session range `[min, max]`.
///
/// Returns `prior` untouched unless `min < prior.lower` or `max > prior.upper`;
/// an exceeded side moves to the new extreme plus `padding * |extreme|`.
pub fn compute_bounds(prior: Option<AxisBounds>, min: f64, max: f64, padding: f64) -> AxisBounds {
    match prior {
        None => AxisBounds {
            lower: pad_down(min, padding),
            upper: pad_up(max, padding),
        },
        Some(prior) => {
            let mut bounds = prior;
            if min < prior.lower {
                bounds.lower = pad_down(min, padding);
            }
            if max > prior.upper {
                bounds.upper = pad_up(max, padding);
            }
            bounds
        }
    }
}

/// Vertical placement of one chart, as fractions of the window height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotSlot {
    pub top: f32,
    pub bottom: f32,
}

impl SubplotSlot {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Stacked single-column grid. Computed once from the asset count.
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotGrid {
    slots: Vec<SubplotSlot>,
}

impl SubplotGrid {
    /// Reserved for the title banner and clock.
    pub const HEADER: f32 = 0.05;
    /// Reserved for the time axis labels and the ticker tape.
    pub const FOOTER: f32 = 0.08;
    /// Gap between adjacent charts.
    pub const GAP: f32 = 0.03;

    pub fn new(count: usize) -> Self {
        if count == 0 {
            return Self { slots: Vec::new() };
        }
        let available = 1.0 - Self::HEADER - Self::FOOTER;
        // gaps never take more than half the chart area
        let gap = Self::GAP.min(available / (2 * count) as f32);
        let height = (available - gap * (count - 1) as f32) / count as f32;
        let slots = (0..count)
            .map(|i| {
                let top = Self::HEADER + i as f32 * (height + gap);
                SubplotSlot {
                    top,
                    bottom: top + height,
                }
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<SubplotSlot> {
        self.slots.get(index).copied()
    }

    pub fn slots(&self) -> &[SubplotSlot] {
        &self.slots
    }
}
