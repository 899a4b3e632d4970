//axes_util.rs
use crate::layout::AxisBounds;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// `1234567.891` -> `"1,234,567.89"`.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// Short axis label; drops decimals once the tick spacing is whole.
pub fn format_tick(price: f64, spacing: f64) -> String {
    if spacing >= 1.0 {
        let rounded = format_value(price.round());
        rounded.trim_end_matches(".00").to_string()
    } else {
        format_value(price)
    }
}

pub fn nice_range(min: f64, max: f64, ticks: usize) -> (f64, f64, f64) {
    let range = (max - min).max(1e-9);
    if range <= 1e-9 {
        return (min, max, 1.0);
    }

    let tick_spacing = range / (ticks.max(2) - 1) as f64;
    let magnitude = 10f64.powf(tick_spacing.log10().floor());
    let normalized = tick_spacing / magnitude;

    let nice_tick = match normalized {
        n if n <= 1.5 => 1.0,
        n if n <= 3.0 => 2.0,
        n if n <= 7.0 => 5.0,
        _ => 10.0,
    } * magnitude;

    let nice_tick = nice_tick.max(1e-9);
    let nice_min = (min / nice_tick).floor() * nice_tick;
    let nice_max = (max / nice_tick).ceil() * nice_tick;

    if (nice_max - nice_min) / nice_tick > 1000.0 {
        return (min, max, range / 4.0);
    }

    (nice_min, nice_max, nice_tick)
}

/// Gridline prices strictly inside `bounds`, with their labels.
pub fn price_ticks(bounds: AxisBounds, target: usize) -> Vec<(f64, String)> {
    let (nice_min, nice_max, spacing) = nice_range(bounds.lower, bounds.upper, target);
    if nice_max <= nice_min || spacing <= 1e-9 {
        return vec![];
    }
    let count = (((nice_max - nice_min) / spacing).round() as i64).min(100);
    (0..=count)
        .map(|i| nice_min + i as f64 * spacing)
        .filter(|&p| bounds.contains(p))
        .map(|p| (p, format_tick(p, spacing)))
        .collect()
}

pub fn choose_time_interval(time_span_ms: i64, target_lines: usize) -> i64 {
    let intervals = [
        60_000, 300_000, 900_000, 1_800_000, 3_600_000, 7_200_000, 14_400_000, 43_200_000,
        86_400_000,
    ];
    let wanted = time_span_ms / target_lines.max(1) as i64;
    intervals
        .iter()
        .copied()
        .find(|&i| i >= wanted)
        .unwrap_or(intervals[intervals.len() - 1])
}

/// Gridline times aligned to the chosen interval within `[start, end]`.
pub fn time_ticks(start: i64, end: i64, target_lines: usize) -> Vec<i64> {
    if end <= start {
        return vec![];
    }
    let interval = choose_time_interval(end - start, target_lines);
    let first = start + (interval - start.rem_euclid(interval)) % interval;
    (0..)
        .map(|i| first + i * interval)
        .take_while(|&t| t <= end)
        .collect()
}

pub fn format_time_label(time_ms: i64, spans_days: bool) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp_millis(time_ms) else {
        return String::new();
    };
    if spans_days && dt.hour() == 0 && dt.minute() == 0 {
        format!("{:02}.{:02}", dt.day(), dt.month())
    } else {
        dt.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0 => "0.00")]
    #[test_case(5.0 => "5.00")]
    #[test_case(999.999 => "1,000.00")]
    #[test_case(1234.5 => "1,234.50")]
    #[test_case(125_432.1 => "125,432.10")]
    #[test_case(1_234_567.891 => "1,234,567.89")]
    #[test_case(-9876.5 => "-9,876.50")]
    #[test_case(-0.001 => "0.00")]
    fn formats_with_separators(value: f64) -> String {
        format_value(value)
    }

    #[test]
    fn price_ticks_are_inside_bounds() {
        let bounds = AxisBounds { lower: 97.3, upper: 118.45 };
        let ticks = price_ticks(bounds, 6);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|(p, _)| bounds.contains(*p)));
        assert_eq!(ticks[0].1, "100");
    }

    #[test]
    fn time_ticks_align_to_interval() {
        // 09:07 .. 15:52 UTC on one day
        let start = 1_700_000_000_000 - 1_700_000_000_000 % 86_400_000 + 9 * 3_600_000 + 7 * 60_000;
        let end = start + 6 * 3_600_000 + 45 * 60_000;
        let ticks = time_ticks(start, end, 8);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|&t| t >= start && t <= end && t % 3_600_000 == 0));
        assert_eq!(format_time_label(ticks[0], false), "10:00");
    }

    #[test]
    fn empty_time_span_has_no_ticks() {
        assert!(time_ticks(10, 10, 5).is_empty());
    }
}
