// scene.rs - retained figure state the refresh loop draws into
use crate::error::RenderError;
use crate::fetch::Sample;
use crate::layout::AxisBounds;

/// Drawing primitives the refresh loop issues. `index` is the chart slot.
pub trait RenderSurface {
    fn set_line_data(&mut self, index: usize, samples: &[Sample]) -> Result<(), RenderError>;
    fn set_axis_bounds(&mut self, index: usize, bounds: AxisBounds) -> Result<(), RenderError>;
    fn draw_label(&mut self, index: usize, label: ValueLabel) -> Result<(), RenderError>;
    fn set_tape(&mut self, text: &str);
    fn set_clock(&mut self, text: &str);
    /// Marks the end of a tick's drawing.
    fn advance_frame(&mut self);
}

/// Text anchored at a point of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub time: i64,
    pub price: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScene {
    pub title: String,
    pub samples: Vec<Sample>,
    pub bounds: Option<AxisBounds>,
    pub label: Option<ValueLabel>,
}

impl ChartScene {
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((self.samples.first()?.time, self.samples.last()?.time))
    }
}

/// Everything painted on screen. Only the refresh loop writes to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub charts: Vec<ChartScene>,
    pub tape: String,
    pub clock: String,
    pub frame: u64,
}

impl Scene {
    pub fn new<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            charts: titles
                .into_iter()
                .map(|t| ChartScene {
                    title: t.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn chart_mut(&mut self, index: usize) -> Result<&mut ChartScene, RenderError> {
        let count = self.charts.len();
        self.charts
            .get_mut(index)
            .ok_or(RenderError::MissingSlot { index, count })
    }

    /// Time span covered by all charts together; the charts share it.
    pub fn shared_time_range(&self) -> Option<(i64, i64)> {
        self.charts
            .iter()
            .filter_map(ChartScene::time_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }
}

impl RenderSurface for Scene {
    fn set_line_data(&mut self, index: usize, samples: &[Sample]) -> Result<(), RenderError> {
        self.chart_mut(index)?.samples = samples.to_vec();
        Ok(())
    }

    fn set_axis_bounds(&mut self, index: usize, bounds: AxisBounds) -> Result<(), RenderError> {
        if !bounds.is_valid() {
            return Err(RenderError::InvalidBounds {
                index,
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        self.chart_mut(index)?.bounds = Some(bounds);
        Ok(())
    }

    fn draw_label(&mut self, index: usize, label: ValueLabel) -> Result<(), RenderError> {
        self.chart_mut(index)?.label = Some(label);
        Ok(())
    }

    fn set_tape(&mut self, text: &str) {
        self.tape = text.to_string();
    }

    fn set_clock(&mut self, text: &str) {
        self.clock = text.to_string();
    }

    fn advance_frame(&mut self) {
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_is_error() {
        let mut scene = Scene::new(["A"]);
        assert_eq!(
            scene.set_line_data(1, &[]),
            Err(RenderError::MissingSlot { index: 1, count: 1 })
        );
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut scene = Scene::new(["A"]);
        let err = scene
            .set_axis_bounds(0, AxisBounds { lower: 2.0, upper: 1.0 })
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidBounds { index: 0, .. }));
        assert_eq!(scene.charts[0].bounds, None);
    }

    #[test]
    fn shared_time_range_spans_all_charts() {
        let mut scene = Scene::new(["A", "B", "C"]);
        scene
            .set_line_data(0, &[Sample::new(100, 1.0), Sample::new(500, 1.0)])
            .unwrap();
        scene
            .set_line_data(2, &[Sample::new(50, 1.0), Sample::new(300, 1.0)])
            .unwrap();
        assert_eq!(scene.shared_time_range(), Some((50, 500)));
        assert_eq!(Scene::new(["A"]).shared_time_range(), None);
    }
}
