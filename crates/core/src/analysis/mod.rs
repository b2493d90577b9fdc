pub mod alerts;
pub mod insight;
pub mod scoring;
pub mod signals;

pub use alerts::{compute_alerts, compute_alerts_at};
pub use insight::{compute_insight, compute_insight_at};
pub use signals::{compute_signals, Signals};

/// Renders a reading for narrative text: integral values keep one decimal (`4.0`),
/// everything else uses the shortest round-trip form (`3.75`, `-0.2`).
pub(crate) fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn formats_readings() {
        assert_eq!(format_value(4.0), "4.0");
        assert_eq!(format_value(7.5), "7.5");
        assert_eq!(format_value(-0.2), "-0.2");
        assert_eq!(format_value(5.33), "5.33");
    }
}
